//! Connector and group tools

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::environment::resolve_environment;
use super::pagination::paginate;
use super::tool_handler::{connector_url, endpoint, env_filter, require_id, FivetranToolHandler, ListConnectorsArgs};
use crate::domain::diagnosis::{diagnose, hours_since, DiagnosisResult};
use crate::domain::model::{ApiEnvelope, ConnectorRecord, Group, SchemaStatus, TableCounts, Warning};
use crate::domain::status::{classify, ConnectorStatus, StatusFilter};
use crate::domain::{FivetranError, FivetranResult};

#[derive(Debug, Serialize)]
pub struct ListFilters {
    pub env: Option<String>,
    pub env_groups: Option<Vec<String>>,
    pub status: String,
}

impl ListFilters {
    /// Human-readable filter description for log lines
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let (Some(env), Some(groups)) = (&self.env, &self.env_groups) {
            parts.push(format!("env={} ({})", env, groups.join(", ")));
        }
        if self.status != "all" {
            parts.push(format!("status={}", self.status));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConnectorSummary {
    pub id: String,
    pub service: Option<String>,
    pub schema: Option<String>,
    pub group_id: Option<String>,
    pub connector_status: ConnectorStatus,
    pub sync_state: Option<String>,
    pub setup_state: Option<String>,
    pub paused: bool,
    pub warning_count: usize,
    pub dashboard_url: String,
}

impl ConnectorSummary {
    fn new(connector: ConnectorRecord, connector_status: ConnectorStatus) -> Self {
        Self {
            dashboard_url: connector_url(&connector.id),
            warning_count: connector.status.warnings.len(),
            connector_status,
            paused: connector.paused,
            sync_state: connector.status.sync_state,
            setup_state: connector.status.setup_state,
            id: connector.id,
            service: connector.service,
            schema: connector.schema,
            group_id: connector.group_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConnectorList {
    pub connectors: Vec<ConnectorSummary>,
    pub count: usize,
    pub filters: ListFilters,
}

#[derive(Debug, Serialize)]
pub struct TableReport {
    pub name: String,
    pub enabled: bool,
    pub sync_mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SchemaReport {
    pub name: String,
    pub enabled: bool,
    pub tables: Vec<TableReport>,
    pub table_count: usize,
    pub enabled_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SchemaStatusReport {
    pub connector_id: String,
    pub dashboard_url: String,
    pub schemas: Vec<SchemaReport>,
    pub schema_count: usize,
    pub summary: TableCounts,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDiagnosis {
    pub connector_id: String,
    pub dashboard_url: String,
    #[serde(flatten)]
    pub diagnosis: DiagnosisResult,
    pub issue_count: usize,
}

#[derive(Debug, Serialize)]
pub struct GroupList {
    pub groups: Vec<Group>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct LastSyncs {
    pub last_success: Option<String>,
    pub last_failure: Option<String>,
    pub sync_started: Option<String>,
    pub hours_since_success: Option<f64>,
    pub hours_since_failure: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct Counted<T> {
    pub count: usize,
    pub details: Vec<T>,
}

impl<T> Counted<T> {
    fn new(details: Vec<T>) -> Self {
        Self {
            count: details.len(),
            details,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SyncConfig {
    pub sync_frequency: Option<Value>,
    pub schedule_type: Option<String>,
    pub daily_sync_time: Option<String>,
    pub networking_method: Option<String>,
    pub local_processing_agent_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncHistory {
    pub connector_id: String,
    pub dashboard_url: String,
    pub service: Option<String>,
    pub schema: Option<String>,
    pub paused: bool,
    pub sync_state: Option<String>,
    pub setup_state: Option<String>,
    pub update_state: Option<String>,
    pub is_historical_sync: bool,
    pub last_syncs: LastSyncs,
    pub warnings: Counted<Warning>,
    pub tasks: Counted<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_config: Option<SyncConfig>,
}

impl FivetranToolHandler {
    async fn fetch_connector(&self, connector_id: &str) -> FivetranResult<ConnectorRecord> {
        let api = self.api()?;
        let response = api.get(&endpoint("connectors", connector_id, None), &[]).await?;
        Ok(serde_json::from_value::<ApiEnvelope<ConnectorRecord>>(response)?.into_data())
    }

    async fn fetch_schemas(&self, connector_id: &str) -> FivetranResult<SchemaStatus> {
        let api = self.api()?;
        let response = api
            .get(&endpoint("connectors", connector_id, Some("schemas")), &[])
            .await?;
        Ok(serde_json::from_value::<ApiEnvelope<SchemaStatus>>(response)?.into_data())
    }

    /// List connectors, optionally narrowed to an environment and a status.
    pub async fn list_connectors(&self, args: ListConnectorsArgs) -> FivetranResult<ConnectorList> {
        let status_filter = StatusFilter::parse(args.status.as_deref())?;
        let env = env_filter(args.env);
        let api = self.api()?;

        let mut env_groups = None;
        let connectors: Vec<ConnectorRecord> = match &env {
            Some(env) => {
                let resolved = resolve_environment(api, env, self.max_pages()).await?;
                if resolved.is_empty() {
                    return Err(FivetranError::Validation(format!(
                        "No groups found matching environment '{}'",
                        env
                    )));
                }

                let mut all = Vec::new();
                for group_id in &resolved.group_ids {
                    let path = endpoint("groups", group_id, Some("connectors"));
                    all.extend(paginate::<ConnectorRecord>(api, &path, &[], self.max_pages()).await?);
                }
                env_groups = Some(resolved.group_names);
                all
            }
            None => paginate(api, "connectors", &[], self.max_pages()).await?,
        };

        let results: Vec<ConnectorSummary> = connectors
            .into_iter()
            .filter_map(|connector| {
                let status = classify(&connector);
                status_filter
                    .matches(status)
                    .then(|| ConnectorSummary::new(connector, status))
            })
            .collect();

        let filters = ListFilters {
            env,
            env_groups,
            status: status_filter.to_string(),
        };
        info!("Listed {} connectors (filters: {})", results.len(), filters.describe());

        Ok(ConnectorList {
            count: results.len(),
            connectors: results,
            filters,
        })
    }

    /// Table-level enablement for one connector.
    pub async fn get_connector_schema_status(&self, connector_id: &str) -> FivetranResult<SchemaStatusReport> {
        let connector_id = require_id(connector_id, "connector_id")?;
        let status = self.fetch_schemas(&connector_id).await?;
        let summary = status.table_counts();

        let schemas: Vec<SchemaReport> = status
            .schemas
            .into_iter()
            .map(|(name, schema)| {
                let tables: Vec<TableReport> = schema
                    .tables
                    .into_iter()
                    .map(|(name, table)| TableReport {
                        name,
                        enabled: table.enabled,
                        sync_mode: table.sync_mode,
                    })
                    .collect();
                SchemaReport {
                    name,
                    enabled: schema.enabled,
                    table_count: tables.len(),
                    enabled_count: tables.iter().filter(|t| t.enabled).count(),
                    tables,
                }
            })
            .collect();

        info!("Retrieved schema status for connector: {}", connector_id);

        Ok(SchemaStatusReport {
            dashboard_url: connector_url(&connector_id),
            connector_id,
            schema_count: schemas.len(),
            schemas,
            summary,
        })
    }

    /// Fetch connector detail and schemas (two requests) and diagnose them.
    pub async fn diagnose_connector(&self, connector_id: &str) -> FivetranResult<ConnectorDiagnosis> {
        let connector_id = require_id(connector_id, "connector_id")?;
        let connector = self.fetch_connector(&connector_id).await?;
        let schemas = self.fetch_schemas(&connector_id).await?;

        let diagnosis = diagnose(&connector, &schemas, Utc::now());
        info!(
            "Diagnosed connector {}: {}",
            connector_id,
            diagnosis.overall_health.as_str()
        );

        Ok(ConnectorDiagnosis {
            dashboard_url: connector_url(&connector_id),
            connector_id,
            issue_count: diagnosis.issues.len(),
            diagnosis,
        })
    }

    pub async fn get_sync_history(&self, connector_id: &str, include_config: bool) -> FivetranResult<SyncHistory> {
        let connector_id = require_id(connector_id, "connector_id")?;
        let connector = self.fetch_connector(&connector_id).await?;
        let now = Utc::now();

        let sync_config = include_config.then(|| SyncConfig {
            sync_frequency: connector.sync_frequency.clone(),
            schedule_type: connector.schedule_type.clone(),
            daily_sync_time: connector.daily_sync_time.clone(),
            networking_method: connector.networking_method.clone(),
            local_processing_agent_id: connector.local_processing_agent_id.clone(),
        });

        info!("Retrieved sync history for connector: {}", connector_id);

        Ok(SyncHistory {
            dashboard_url: connector_url(&connector_id),
            connector_id,
            service: connector.service,
            schema: connector.schema,
            paused: connector.paused,
            last_syncs: LastSyncs {
                hours_since_success: hours_since(connector.succeeded_at.as_deref(), now),
                hours_since_failure: hours_since(connector.failed_at.as_deref(), now),
                last_success: connector.succeeded_at,
                last_failure: connector.failed_at,
                sync_started: connector.sync_started,
            },
            sync_state: connector.status.sync_state,
            setup_state: connector.status.setup_state,
            update_state: connector.status.update_state,
            is_historical_sync: connector.status.is_historical_sync,
            warnings: Counted::new(connector.status.warnings),
            tasks: Counted::new(connector.status.tasks),
            sync_config,
        })
    }

    pub async fn list_groups(&self) -> FivetranResult<GroupList> {
        let api = self.api()?;
        let groups: Vec<Group> = paginate(api, "groups", &[], self.max_pages()).await?;
        info!("Listed {} groups", groups.len());

        Ok(GroupList {
            count: groups.len(),
            groups,
        })
    }
}
