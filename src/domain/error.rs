//! Error types for Fivetran tool operations

use serde_json::{json, Value};
use thiserror::Error;

const API_REFERENCE_DOCS: &str = "https://fivetran.com/docs/rest-api/api-reference";

/// Errors that can occur while serving a Fivetran tool call
#[derive(Debug, Error)]
pub enum FivetranError {
    /// Credentials missing or unusable
    #[error("{0}")]
    Configuration(String),

    /// Upstream answered with an HTTP status >= 400
    #[error("{message}")]
    Api {
        status_code: u16,
        message: String,
        hint: String,
        docs: String,
    },

    /// Bad tool input, detected before any network call
    #[error("{0}")]
    Validation(String),

    /// The upstream kept returning a cursor past the page ceiling
    #[error("Pagination did not terminate after {max_pages} pages for endpoint '{endpoint}'")]
    PaginationLimit { endpoint: String, max_pages: usize },

    /// Anything else (network, decoding, ...)
    #[error("{0}")]
    Unexpected(String),
}

impl FivetranError {
    /// Map an upstream HTTP failure onto a curated error.
    ///
    /// 401, 403, 404, 429 and 500 carry a fixed hint and documentation link.
    /// Other statuses use the `message` field of the JSON body when present,
    /// falling back to the raw body text.
    pub fn from_status(status_code: u16, endpoint: &str, body: &str) -> Self {
        let (message, hint, docs) = match status_code {
            401 => (
                "Authentication failed".to_string(),
                "Check FIVETRAN_API_KEY and FIVETRAN_API_SECRET are correct",
                "https://fivetran.com/docs/rest-api/getting-started",
            ),
            403 => (
                "Access forbidden".to_string(),
                "Your API key may not have permission for this resource",
                API_REFERENCE_DOCS,
            ),
            404 => (
                format!("Resource not found: {}", endpoint),
                "Check the connector_id, group_id, or agent_id is correct",
                API_REFERENCE_DOCS,
            ),
            429 => (
                "Rate limit exceeded".to_string(),
                "Too many requests. Wait a moment and try again",
                "https://fivetran.com/docs/rest-api/api-limits",
            ),
            500 => (
                "Fivetran server error".to_string(),
                "This is a Fivetran-side issue. Try again later",
                "https://status.fivetran.com",
            ),
            _ => {
                let detail = serde_json::from_str::<Value>(body)
                    .ok()
                    .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_else(|| body.to_string());
                (
                    format!("API error: {}", detail),
                    "Check the Fivetran API documentation",
                    API_REFERENCE_DOCS,
                )
            }
        };

        FivetranError::Api {
            status_code,
            message,
            hint: hint.to_string(),
            docs: docs.to_string(),
        }
    }

    /// Wire-level error object returned to the tool caller
    pub fn to_response(&self) -> Value {
        match self {
            FivetranError::Api {
                status_code,
                message,
                hint,
                docs,
            } => json!({
                "status": "error",
                "error": message,
                "status_code": status_code,
                "hint": hint,
                "docs": docs,
            }),
            other => json!({
                "status": "error",
                "error": other.to_string(),
            }),
        }
    }

    pub fn is_api(&self) -> bool {
        matches!(self, FivetranError::Api { .. })
    }
}

impl From<reqwest::Error> for FivetranError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FivetranError::Unexpected(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            FivetranError::Unexpected(format!("Connection error: {}", err))
        } else {
            FivetranError::Unexpected(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FivetranError {
    fn from(err: serde_json::Error) -> Self {
        FivetranError::Unexpected(format!("Invalid response payload: {}", err))
    }
}

/// Result type alias for Fivetran operations
pub type FivetranResult<T> = Result<T, FivetranError>;
