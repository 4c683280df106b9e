//! Typed views over Fivetran REST payloads
//!
//! Every field the tools read is decoded here with its default declared once:
//! missing or `null` values become `false`, empty collections or `None`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use indexmap::IndexMap;

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Standard `{"code": ..., "data": {...}}` response wrapper
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub data: Option<T>,
}

impl<T: Default> ApiEnvelope<T> {
    pub fn into_data(self) -> T {
        self.data.unwrap_or_default()
    }
}

/// One page of a cursor-paginated listing
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Warning {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// The nested `status` block of a connector
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncStatus {
    #[serde(default)]
    pub sync_state: Option<String>,
    #[serde(default)]
    pub setup_state: Option<String>,
    #[serde(default)]
    pub update_state: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_historical_sync: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<Warning>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectorRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paused: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: SyncStatus,
    #[serde(default)]
    pub succeeded_at: Option<String>,
    #[serde(default)]
    pub failed_at: Option<String>,
    #[serde(default)]
    pub sync_started: Option<String>,
    #[serde(default)]
    pub sync_frequency: Option<Value>,
    #[serde(default)]
    pub schedule_type: Option<String>,
    #[serde(default)]
    pub daily_sync_time: Option<String>,
    #[serde(default)]
    pub networking_method: Option<String>,
    #[serde(default)]
    pub local_processing_agent_id: Option<String>,
}

impl ConnectorRecord {
    pub fn sync_state(&self) -> &str {
        self.status.sync_state.as_deref().unwrap_or("")
    }

    pub fn setup_state(&self) -> &str {
        self.status.setup_state.as_deref().unwrap_or("")
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.status.warnings
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(default)]
    pub sync_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tables: IndexMap<String, TableConfig>,
}

/// Body of `GET connectors/{id}/schemas`, keyed by schema name in upstream order
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub schemas: IndexMap<String, SchemaConfig>,
}

/// Table totals across every schema of a connector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub total_tables: usize,
    pub enabled_tables: usize,
    pub disabled_tables: usize,
}

impl SchemaStatus {
    pub fn table_counts(&self) -> TableCounts {
        let (total, enabled) = self
            .schemas
            .values()
            .flat_map(|schema| schema.tables.values())
            .fold((0, 0), |(total, enabled), table| {
                (total + 1, enabled + usize::from(table.enabled))
            });

        TableCounts {
            total_tables: total,
            enabled_tables: enabled,
            disabled_tables: total - enabled,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Group {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HybridAgent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(default)]
    pub registered_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub online: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connector_defaults_for_missing_fields() {
        let connector: ConnectorRecord = serde_json::from_value(json!({ "id": "c1" })).unwrap();
        assert_eq!(connector.id, "c1");
        assert!(!connector.paused);
        assert_eq!(connector.sync_state(), "");
        assert_eq!(connector.setup_state(), "");
        assert!(connector.warnings().is_empty());
        assert!(connector.succeeded_at.is_none());
    }

    #[test]
    fn test_connector_nulls_decode_as_defaults() {
        let connector: ConnectorRecord = serde_json::from_value(json!({
            "id": null,
            "paused": null,
            "status": { "warnings": null, "tasks": null, "sync_state": null }
        }))
        .unwrap();
        assert_eq!(connector.id, "");
        assert!(!connector.paused);
        assert!(connector.warnings().is_empty());
    }

    #[test]
    fn test_table_counts_sum_across_schemas() {
        let status: SchemaStatus = serde_json::from_value(json!({
            "schemas": {
                "public": {
                    "enabled": true,
                    "tables": {
                        "users": { "enabled": true, "sync_mode": "SOFT_DELETE" },
                        "orders": { "enabled": false }
                    }
                },
                "audit": {
                    "enabled": false,
                    "tables": { "events": { "enabled": false } }
                },
                "empty": { "enabled": true }
            }
        }))
        .unwrap();

        let counts = status.table_counts();
        assert_eq!(counts.total_tables, 3);
        assert_eq!(counts.enabled_tables, 1);
        assert_eq!(counts.disabled_tables, 2);
        assert_eq!(counts.enabled_tables + counts.disabled_tables, counts.total_tables);
    }

    #[test]
    fn test_schemas_keep_upstream_order() {
        let body: Value = serde_json::from_str(
            r#"{"schemas": {"zeta": {"enabled": true, "tables": {"users": {}, "accounts": {}}}, "alpha": {}}}"#,
        )
        .unwrap();
        let status: SchemaStatus = serde_json::from_value(body).unwrap();

        let schemas: Vec<_> = status.schemas.keys().map(String::as_str).collect();
        assert_eq!(schemas, ["zeta", "alpha"]);
        let tables: Vec<_> = status.schemas["zeta"].tables.keys().map(String::as_str).collect();
        assert_eq!(tables, ["users", "accounts"]);
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: ApiEnvelope<SchemaStatus> = serde_json::from_value(json!({ "code": "Success" })).unwrap();
        assert!(envelope.into_data().schemas.is_empty());
    }

    #[test]
    fn test_page_with_empty_cursor() {
        let page: Page<Group> = serde_json::from_value(json!({
            "items": [{ "id": "g1", "name": "prod" }],
            "next_cursor": ""
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next_cursor.as_deref(), Some(""));
    }
}
