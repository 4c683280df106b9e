//! Fivetran tool registry and dispatch
//!
//! Every tool returns a typed `FivetranResult`; `respond` is the single place
//! that turns it into the `{status: success|error, ...}` object sent to the
//! MCP client.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

use crate::adapters::fivetran_client::FivetranClient;
use crate::config::FivetranSettings;
use crate::domain::{FivetranApi, FivetranError, FivetranResult, Tool, ToolPort};

/// Fivetran dashboard base URL for connector links
pub const CONNECTOR_DASHBOARD_URL: &str = "https://fivetran.com/dashboard/connectors";

pub fn connector_url(connector_id: &str) -> String {
    format!("{}/{}/status", CONNECTOR_DASHBOARD_URL, connector_id)
}

/// Build a path with one URL-encoded identifier segment.
pub(crate) fn endpoint(prefix: &str, id: &str, suffix: Option<&str>) -> String {
    let encoded = urlencoding::encode(id);
    match suffix {
        Some(suffix) => format!("{}/{}/{}", prefix, encoded, suffix),
        None => format!("{}/{}", prefix, encoded),
    }
}

/// Trimmed, non-blank identifier or a validation error naming the field.
pub(crate) fn require_id(value: &str, field: &str) -> FivetranResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FivetranError::Validation(format!(
            "{} is required and cannot be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// Blank environment filters count as "no filter".
pub(crate) fn env_filter(env: Option<String>) -> Option<String> {
    env.filter(|e| !e.is_empty())
}

// ============================================================================
// Tool arguments
// ============================================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListConnectorsArgs {
    /// Environment filter: a group id, or part of a group name such as "dev", "prod", "sandbox"
    #[serde(default)]
    pub env: Option<String>,
    /// One of "all" (default), "failed", "healthy", "paused", "warning"
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ConnectorIdArgs {
    /// The unique identifier for the connector
    #[serde(default)]
    pub connector_id: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SyncHistoryArgs {
    /// The unique identifier for the connector
    #[serde(default)]
    pub connector_id: String,
    /// Also return the connector's schedule and networking configuration
    #[serde(default)]
    pub include_config: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHybridAgentsArgs {
    /// Environment filter: a group id, or part of a group name such as "dev", "prod", "sandbox"
    #[serde(default)]
    pub env: Option<String>,
    /// One of "all" (default), "live", "offline". Other than "all" costs one request per agent.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AgentIdArgs {
    /// The unique identifier for the hybrid deployment agent
    #[serde(default)]
    pub agent_id: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

// ============================================================================
// Handler
// ============================================================================

/// The Fivetran API as seen by the tools: either a ready client or the reason
/// it could not be built.
enum ApiSlot {
    Ready(Arc<dyn FivetranApi>),
    Unconfigured(String),
}

pub struct FivetranToolHandler {
    api: ApiSlot,
    max_pages: usize,
}

impl FivetranToolHandler {
    pub fn new(api: Arc<dyn FivetranApi>, max_pages: usize) -> Self {
        Self {
            api: ApiSlot::Ready(api),
            max_pages,
        }
    }

    /// A handler whose every tool reports `reason` as a configuration error.
    pub fn unconfigured(reason: impl Into<String>, max_pages: usize) -> Self {
        Self {
            api: ApiSlot::Unconfigured(reason.into()),
            max_pages,
        }
    }

    /// Build the Fivetran client from settings. Missing credentials do not stop
    /// the server; they surface on each tool call instead.
    pub fn from_settings(settings: &FivetranSettings) -> Self {
        match FivetranClient::new(settings) {
            Ok(client) => Self::new(Arc::new(client), settings.max_pages),
            Err(e) => {
                warn!("Fivetran client not configured: {}", e);
                Self::unconfigured(e.to_string(), settings.max_pages)
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.api, ApiSlot::Ready(_))
    }

    pub(crate) fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub(crate) fn api(&self) -> FivetranResult<&dyn FivetranApi> {
        match &self.api {
            ApiSlot::Ready(api) => Ok(api.as_ref()),
            ApiSlot::Unconfigured(reason) => Err(FivetranError::Configuration(reason.clone())),
        }
    }

    fn tool_definitions() -> Vec<Tool> {
        vec![
            tool::<ListConnectorsArgs>(
                "list_connectors",
                "List Fivetran connectors, filtered by environment and/or status (all, failed, healthy, paused, warning).",
            ),
            tool::<ConnectorIdArgs>(
                "get_connector_schema_status",
                "Get table-level sync status for a connector: which schemas and tables are enabled, with summary counts.",
            ),
            tool::<ConnectorIdArgs>(
                "diagnose_connector",
                "Comprehensive health check for a connector with issues, severities and recommendations.",
            ),
            tool::<SyncHistoryArgs>(
                "get_sync_history",
                "Recent sync timestamps, sync/setup state, warnings and tasks for a connector.",
            ),
            tool::<NoArgs>(
                "list_groups",
                "List all Fivetran groups (destinations) with their ids, for use as environment filters.",
            ),
            tool::<ListHybridAgentsArgs>(
                "list_hybrid_agents",
                "List Hybrid Deployment Agents, filtered by environment and/or status (all, live, offline).",
            ),
            tool::<AgentIdArgs>(
                "get_hybrid_agent_details",
                "Get detailed status for a specific Hybrid Deployment Agent, including the connectors using it.",
            ),
        ]
    }
}

fn tool<A: JsonSchema>(name: &str, description: &str) -> Tool {
    let schema = serde_json::to_value(schemars::schema_for!(A)).unwrap_or_else(|_| json!({ "type": "object" }));
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: schema,
    }
}

fn parse_args<A: DeserializeOwned>(args: Value) -> FivetranResult<A> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|e| FivetranError::Validation(format!("Invalid arguments: {}", e)))
}

/// Convert a tool outcome into the uniform wire object.
pub fn respond<T: Serialize>(tool: &str, result: FivetranResult<T>) -> Value {
    let error = match result {
        Ok(output) => match serde_json::to_value(output) {
            Ok(Value::Object(mut map)) => {
                map.insert("status".to_string(), json!("success"));
                return Value::Object(map);
            }
            Ok(other) => return json!({ "status": "success", "result": other }),
            Err(e) => FivetranError::from(e),
        },
        Err(e) => e,
    };

    match &error {
        FivetranError::Api { status_code, .. } => {
            warn!(tool, status_code, "Fivetran API error: {}", error)
        }
        FivetranError::Validation(_) => warn!(tool, "Rejected tool call: {}", error),
        FivetranError::Configuration(_) => error!(tool, "Configuration error: {}", error),
        _ => error!(tool, "Tool failed: {}", error),
    }
    error.to_response()
}

#[async_trait]
impl ToolPort for FivetranToolHandler {
    async fn execute_tool(&self, name: &str, args: Value) -> anyhow::Result<Value> {
        let response = match name {
            "list_connectors" => {
                let result = match parse_args(args) {
                    Ok(args) => self.list_connectors(args).await,
                    Err(e) => Err(e),
                };
                respond(name, result)
            }
            "get_connector_schema_status" => {
                let result = match parse_args::<ConnectorIdArgs>(args) {
                    Ok(args) => self.get_connector_schema_status(&args.connector_id).await,
                    Err(e) => Err(e),
                };
                respond(name, result)
            }
            "diagnose_connector" => {
                let result = match parse_args::<ConnectorIdArgs>(args) {
                    Ok(args) => self.diagnose_connector(&args.connector_id).await,
                    Err(e) => Err(e),
                };
                respond(name, result)
            }
            "get_sync_history" => {
                let result = match parse_args::<SyncHistoryArgs>(args) {
                    Ok(args) => self.get_sync_history(&args.connector_id, args.include_config).await,
                    Err(e) => Err(e),
                };
                respond(name, result)
            }
            "list_groups" => respond(name, self.list_groups().await),
            "list_hybrid_agents" => {
                let result = match parse_args(args) {
                    Ok(args) => self.list_hybrid_agents(args).await,
                    Err(e) => Err(e),
                };
                respond(name, result)
            }
            "get_hybrid_agent_details" => {
                let result = match parse_args::<AgentIdArgs>(args) {
                    Ok(args) => self.get_hybrid_agent_details(&args.agent_id).await,
                    Err(e) => Err(e),
                };
                respond(name, result)
            }
            _ => return Err(anyhow::anyhow!("Tool not found: {}", name)),
        };
        Ok(response)
    }

    async fn list_tools(&self) -> anyhow::Result<Vec<Tool>> {
        Ok(Self::tool_definitions())
    }
}
