use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod diagnosis;
pub mod error;
pub mod model;
pub mod status;

pub use error::{FivetranError, FivetranResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[async_trait]
pub trait ToolPort: Send + Sync {
    async fn execute_tool(&self, name: &str, args: Value) -> anyhow::Result<Value>;
    async fn list_tools(&self) -> anyhow::Result<Vec<Tool>>;
}

/// Read access to the Fivetran REST API.
///
/// `endpoint` is relative to the configured base URL (e.g. `"connectors"`).
/// Implementations return the parsed JSON body, or a `FivetranError::Api`
/// for any HTTP status >= 400.
#[async_trait]
pub trait FivetranApi: Send + Sync {
    async fn get(&self, endpoint: &str, query: &[(String, String)]) -> FivetranResult<Value>;
}
