use thiserror::Error;

use crate::config::{FivetranSettings, ServerSettings, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_server(&settings.server) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_fivetran(&settings.fivetran) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    // Credentials are optional here; tools report their absence.
    fn validate_fivetran(fivetran: &FivetranSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if fivetran.base_url.trim().is_empty() {
            errors.push(ValidationError::MissingField("fivetran.base_url".to_string()));
        } else if !fivetran.base_url.starts_with("http://") && !fivetran.base_url.starts_with("https://") {
            errors.push(ValidationError::InvalidValue {
                field: "fivetran.base_url".to_string(),
                reason: "Must be an http:// or https:// URL".to_string(),
            });
        }

        if fivetran.timeout_seconds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "fivetran.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if fivetran.max_pages == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "fivetran.max_pages".to_string(),
                reason: "Page limit must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
