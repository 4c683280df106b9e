//! Fivetran REST API client
//!
//! Thin reqwest wrapper that authenticates with HTTP Basic auth built from the
//! API key/secret pair and maps HTTP failures onto `FivetranError::Api`.
//!
//! See: https://fivetran.com/docs/rest-api/getting-started

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::FivetranSettings;
use crate::domain::{FivetranApi, FivetranError, FivetranResult};

/// Client for the Fivetran REST API.
///
/// Holds only immutable configuration after construction, so one instance is
/// shared by every tool call.
#[derive(Debug, Clone)]
pub struct FivetranClient {
    client: Client,
    base_url: String,
}

impl FivetranClient {
    /// Create a client from settings.
    ///
    /// Fails with `FivetranError::Configuration` when the key or secret is
    /// missing, or when the HTTP client cannot be built.
    pub fn new(settings: &FivetranSettings) -> FivetranResult<Self> {
        let (api_key, api_secret) = match (&settings.api_key, &settings.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                (key.clone(), SecretString::from(secret.clone()))
            }
            _ => {
                return Err(FivetranError::Configuration(
                    "FIVETRAN_API_KEY and FIVETRAN_API_SECRET must be set. \
                     Set them as environment variables or in the configuration file."
                        .to_string(),
                ))
            }
        };

        let credentials = STANDARD.encode(format!("{}:{}", api_key, api_secret.expose_secret()));
        let mut auth_value = HeaderValue::from_str(&format!("Basic {}", credentials))
            .map_err(|e| FivetranError::Configuration(format!("Invalid API credentials: {}", e)))?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| FivetranError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = settings.base_url.trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Fivetran client initialized");

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = self.url(endpoint);
        debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> FivetranResult<Value> {
        let response = builder.send().await?;
        let status = response.status();

        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(FivetranError::from_status(status.as_u16(), endpoint, &body));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// GET `endpoint` with optional query parameters.
    pub async fn get(&self, endpoint: &str, query: &[(String, String)]) -> FivetranResult<Value> {
        let mut builder = self.request(Method::GET, endpoint);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        self.send(builder, endpoint).await
    }

    /// POST a JSON body to `endpoint`.
    pub async fn post(&self, endpoint: &str, data: &Value) -> FivetranResult<Value> {
        let builder = self.request(Method::POST, endpoint).json(data);
        self.send(builder, endpoint).await
    }

    /// PATCH `endpoint` with a JSON body.
    pub async fn patch(&self, endpoint: &str, data: &Value) -> FivetranResult<Value> {
        let builder = self.request(Method::PATCH, endpoint).json(data);
        self.send(builder, endpoint).await
    }

    /// DELETE `endpoint`.
    pub async fn delete(&self, endpoint: &str) -> FivetranResult<Value> {
        let builder = self.request(Method::DELETE, endpoint);
        self.send(builder, endpoint).await
    }
}

#[async_trait]
impl FivetranApi for FivetranClient {
    async fn get(&self, endpoint: &str, query: &[(String, String)]) -> FivetranResult<Value> {
        FivetranClient::get(self, endpoint, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(key: Option<&str>, secret: Option<&str>) -> FivetranSettings {
        FivetranSettings {
            base_url: "https://api.fivetran.com/v1/".to_string(),
            api_key: key.map(str::to_string),
            api_secret: secret.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_credentials_is_configuration_error() {
        for (key, secret) in [(None, Some("s")), (Some("k"), None), (Some(""), Some("s"))] {
            let err = FivetranClient::new(&settings(key, secret)).unwrap_err();
            assert!(matches!(err, FivetranError::Configuration(_)));
            assert!(err.to_string().contains("FIVETRAN_API_KEY"));
        }
    }

    #[test]
    fn test_url_joining() {
        let client = FivetranClient::new(&settings(Some("k"), Some("s"))).unwrap();
        assert_eq!(client.base_url(), "https://api.fivetran.com/v1");
        assert_eq!(client.url("/connectors"), "https://api.fivetran.com/v1/connectors");
        assert_eq!(client.url("groups/g1/connectors"), "https://api.fivetran.com/v1/groups/g1/connectors");
    }
}
