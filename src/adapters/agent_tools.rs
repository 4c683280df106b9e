//! Hybrid Deployment Agent tools

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::connector_tools::ListFilters;
use super::environment::{resolve_environment, ResolvedEnvironment};
use super::pagination::paginate;
use super::tool_handler::{endpoint, env_filter, require_id, FivetranToolHandler, ListHybridAgentsArgs};
use crate::domain::model::{ApiEnvelope, HybridAgent};
use crate::domain::status::{AgentStatus, AgentStatusFilter};
use crate::domain::{FivetranApi, FivetranError, FivetranResult};

const AGENTS_ENDPOINT: &str = "local-processing-agents";

#[derive(Debug, Serialize)]
pub struct AgentSummary {
    pub id: String,
    pub display_name: Option<String>,
    pub group_id: String,
    pub agent_status: AgentStatus,
    pub registered_at: Option<String>,
    pub connector_count: usize,
}

#[derive(Debug, Serialize)]
pub struct AgentList {
    pub agents: Vec<AgentSummary>,
    pub count: usize,
    pub filters: ListFilters,
}

#[derive(Debug, Serialize)]
pub struct AgentDetails {
    pub agent_id: String,
    pub display_name: Option<String>,
    pub group_id: String,
    pub agent_status: AgentStatus,
    pub registered_at: Option<String>,
    pub connector_count: usize,
    pub usage: Vec<Value>,
}

async fn fetch_agent(api: &dyn FivetranApi, agent_id: &str) -> FivetranResult<HybridAgent> {
    let response = api.get(&endpoint(AGENTS_ENDPOINT, agent_id, None), &[]).await?;
    Ok(serde_json::from_value::<ApiEnvelope<HybridAgent>>(response)?.into_data())
}

impl FivetranToolHandler {
    /// List hybrid agents.
    ///
    /// The listing endpoint does not report connectivity, so a `live` or
    /// `offline` filter costs one detail request per agent left after the
    /// environment filter. With `all` no detail request is made and every
    /// agent is reported as `unknown`.
    pub async fn list_hybrid_agents(&self, args: ListHybridAgentsArgs) -> FivetranResult<AgentList> {
        let status_filter = AgentStatusFilter::parse(args.status.as_deref())?;
        let env = env_filter(args.env);
        let api = self.api()?;

        let resolved: Option<ResolvedEnvironment> = match &env {
            Some(env) => {
                let resolved = resolve_environment(api, env, self.max_pages()).await?;
                if resolved.is_empty() {
                    return Err(FivetranError::Validation(format!(
                        "No groups found matching environment '{}'",
                        env
                    )));
                }
                Some(resolved)
            }
            None => None,
        };

        let agents: Vec<HybridAgent> = paginate(api, AGENTS_ENDPOINT, &[], self.max_pages()).await?;

        let mut results = Vec::new();
        for agent in agents {
            if let Some(resolved) = &resolved {
                if !resolved.contains(&agent.group_id) {
                    continue;
                }
            }

            let agent_status = if status_filter.requires_detail() {
                let status = match fetch_agent(api, &agent.id).await {
                    Ok(detail) => AgentStatus::from_online(detail.online),
                    Err(e) if e.is_api() => {
                        warn!(agent_id = %agent.id, "Skipping agent without detail: {}", e);
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                if !status_filter.matches(status) {
                    continue;
                }
                status
            } else {
                AgentStatus::Unknown
            };

            results.push(AgentSummary {
                connector_count: agent.usage.len(),
                id: agent.id,
                display_name: agent.display_name,
                group_id: agent.group_id,
                agent_status,
                registered_at: agent.registered_at,
            });
        }

        let filters = ListFilters {
            env,
            env_groups: resolved.map(|r| r.group_names),
            status: status_filter.to_string(),
        };
        info!("Listed {} hybrid agents (filters: {})", results.len(), filters.describe());

        Ok(AgentList {
            count: results.len(),
            agents: results,
            filters,
        })
    }

    pub async fn get_hybrid_agent_details(&self, agent_id: &str) -> FivetranResult<AgentDetails> {
        let agent_id = require_id(agent_id, "agent_id")?;
        let agent = fetch_agent(self.api()?, &agent_id).await?;

        info!("Retrieved details for hybrid agent: {}", agent_id);

        Ok(AgentDetails {
            agent_id,
            display_name: agent.display_name,
            group_id: agent.group_id,
            agent_status: AgentStatus::from_online(agent.online),
            registered_at: agent.registered_at,
            connector_count: agent.usage.len(),
            usage: agent.usage,
        })
    }
}
