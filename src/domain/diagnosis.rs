//! Connector health diagnosis
//!
//! Turns a connector detail record and its schema configuration into a list of
//! issues, an overall verdict and a machine-readable snapshot of the checks.
//! The issue order is fixed and part of the output contract.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use super::model::{ConnectorRecord, SchemaStatus};
use super::status::is_broken_setup_state;

/// Hours after which a missing successful sync is reported as stuck
const STALE_SUCCESS_HOURS: f64 = 48.0;
/// Failures younger than this are reported as history
const RECENT_FAILURE_HOURS: f64 = 24.0;
const MAX_WARNING_DETAILS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub category: &'static str,
    pub issue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub recommendation: &'static str,
}

impl Issue {
    fn new(severity: Severity, category: &'static str, issue: impl Into<String>, recommendation: &'static str) -> Self {
        Self {
            severity,
            category,
            issue: issue.into(),
            details: None,
            recommendation,
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallHealth {
    Healthy,
    Warning,
    Unhealthy,
    Paused,
}

impl OverallHealth {
    /// Pause overrides everything; otherwise the worst of high/medium decides.
    /// `low` and `info` issues never lift a connector above healthy.
    pub fn derive(paused: bool, issues: &[Issue]) -> Self {
        if paused {
            OverallHealth::Paused
        } else if issues.iter().any(|i| i.severity == Severity::High) {
            OverallHealth::Unhealthy
        } else if issues.iter().any(|i| i.severity == Severity::Medium) {
            OverallHealth::Warning
        } else {
            OverallHealth::Healthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverallHealth::Healthy => "healthy",
            OverallHealth::Warning => "warning",
            OverallHealth::Unhealthy => "unhealthy",
            OverallHealth::Paused => "paused",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisSummary {
    pub service: Option<String>,
    pub schema: Option<String>,
    pub group_id: Option<String>,
    pub sync_state: String,
    pub setup_state: String,
    pub paused: bool,
    pub last_success: Option<String>,
    pub last_failure: Option<String>,
    pub hours_since_success: Option<f64>,
    pub hours_since_failure: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisChecks {
    pub is_paused: bool,
    pub is_syncing: bool,
    pub setup_complete: bool,
    pub has_warnings: bool,
    pub has_recent_failure: bool,
    pub tables_total: usize,
    pub tables_enabled: usize,
    pub tables_disabled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisResult {
    pub overall_health: OverallHealth,
    pub summary: DiagnosisSummary,
    pub issues: Vec<Issue>,
    pub checks: DiagnosisChecks,
}

/// Parse an upstream ISO-8601 timestamp.
///
/// RFC 3339 strings (including a trailing `Z`) are accepted; a timestamp
/// without an offset is read as UTC. Anything else yields `None`.
pub fn parse_timestamp(ts: Option<&str>) -> Option<DateTime<Utc>> {
    let ts = ts.filter(|s| !s.is_empty())?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Hours elapsed between `ts` and `now`, rounded to one decimal.
pub fn hours_since(ts: Option<&str>, now: DateTime<Utc>) -> Option<f64> {
    let then = parse_timestamp(ts)?;
    let seconds = (now - then).num_milliseconds() as f64 / 1000.0;
    Some((seconds / 3600.0 * 10.0).round() / 10.0)
}

/// Build the full diagnosis for one connector.
pub fn diagnose(connector: &ConnectorRecord, schemas: &SchemaStatus, now: DateTime<Utc>) -> DiagnosisResult {
    let sync_state = connector.sync_state();
    let setup_state = connector.setup_state();
    let paused = connector.paused;
    let warnings = connector.warnings();

    let counts = schemas.table_counts();
    let hours_since_success = hours_since(connector.succeeded_at.as_deref(), now);
    let hours_since_failure = hours_since(connector.failed_at.as_deref(), now);

    let mut issues = Vec::new();

    if paused {
        issues.push(Issue::new(
            Severity::Info,
            "status",
            "Connector is paused",
            "Resume the connector when ready to sync",
        ));
    }

    if is_broken_setup_state(setup_state) {
        issues.push(Issue::new(
            Severity::High,
            "setup",
            format!("Setup is {}", setup_state),
            "Complete connector setup in Fivetran dashboard",
        ));
    }

    if sync_state == "failed" {
        let details = match hours_since_failure {
            Some(hours) if hours != 0.0 => format!("Failed {:.1} hours ago", hours),
            _ => "Recently failed".to_string(),
        };
        issues.push(
            Issue::new(
                Severity::High,
                "sync",
                "Last sync failed",
                "Check Fivetran logs for error details. Common causes: auth expired, network issues, source unavailable",
            )
            .with_details(json!(details)),
        );
    } else if sync_state == "rescheduled" {
        issues.push(Issue::new(
            Severity::Medium,
            "sync",
            "Sync was rescheduled",
            "Fivetran rescheduled due to a transient issue. Monitor next sync",
        ));
    }

    if !warnings.is_empty() {
        let shown = &warnings[..warnings.len().min(MAX_WARNING_DETAILS)];
        issues.push(
            Issue::new(
                Severity::Medium,
                "warnings",
                format!("{} active warning(s)", warnings.len()),
                "Review and resolve warnings in Fivetran dashboard",
            )
            .with_details(json!(shown)),
        );
    }

    if let Some(hours) = hours_since_failure {
        if hours != 0.0 && hours < RECENT_FAILURE_HOURS && sync_state != "failed" {
            issues.push(Issue::new(
                Severity::Low,
                "history",
                format!("Had a failure {:.1} hours ago", hours),
                "Monitor for recurring issues",
            ));
        }
    }

    if let Some(hours) = hours_since_success {
        if hours > STALE_SUCCESS_HOURS && !paused {
            issues.push(Issue::new(
                Severity::Medium,
                "sync",
                format!("No successful sync in {:.1} hours", hours),
                "Check if connector is stuck or having issues",
            ));
        }
    }

    if counts.total_tables > 0 && counts.disabled_tables * 2 > counts.total_tables {
        issues.push(Issue::new(
            Severity::Low,
            "schema",
            format!("{} of {} tables disabled", counts.disabled_tables, counts.total_tables),
            "Verify table selection is intentional",
        ));
    }

    let overall_health = OverallHealth::derive(paused, &issues);

    DiagnosisResult {
        overall_health,
        summary: DiagnosisSummary {
            service: connector.service.clone(),
            schema: connector.schema.clone(),
            group_id: connector.group_id.clone(),
            sync_state: sync_state.to_string(),
            setup_state: setup_state.to_string(),
            paused,
            last_success: connector.succeeded_at.clone(),
            last_failure: connector.failed_at.clone(),
            hours_since_success,
            hours_since_failure,
        },
        issues,
        checks: DiagnosisChecks {
            is_paused: paused,
            is_syncing: sync_state == "syncing",
            setup_complete: setup_state == "connected",
            has_warnings: !warnings.is_empty(),
            has_recent_failure: hours_since_failure.is_some_and(|h| h < RECENT_FAILURE_HOURS),
            tables_total: counts.total_tables,
            tables_enabled: counts.enabled_tables,
            tables_disabled: counts.disabled_tables,
        },
    }
}
