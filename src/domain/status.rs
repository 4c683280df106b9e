//! Connector status classification and listing filters

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::FivetranError;
use super::model::ConnectorRecord;

const FAILED_SYNC_STATES: [&str; 2] = ["failed", "rescheduled"];
const FAILED_SETUP_STATES: [&str; 2] = ["broken", "incomplete"];

/// Status category shown in connector listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStatus {
    Paused,
    Failed,
    Warning,
    Healthy,
}

impl ConnectorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorStatus::Paused => "paused",
            ConnectorStatus::Failed => "failed",
            ConnectorStatus::Warning => "warning",
            ConnectorStatus::Healthy => "healthy",
        }
    }
}

pub fn is_failed_sync_state(sync_state: &str) -> bool {
    FAILED_SYNC_STATES.contains(&sync_state)
}

pub fn is_broken_setup_state(setup_state: &str) -> bool {
    FAILED_SETUP_STATES.contains(&setup_state)
}

/// Classify a connector. Checks run in a fixed order and the first hit wins,
/// so a paused connector reports `Paused` even when its sync has failed.
pub fn classify(connector: &ConnectorRecord) -> ConnectorStatus {
    if connector.paused {
        ConnectorStatus::Paused
    } else if is_failed_sync_state(connector.sync_state())
        || is_broken_setup_state(connector.setup_state())
    {
        ConnectorStatus::Failed
    } else if !connector.warnings().is_empty() {
        ConnectorStatus::Warning
    } else {
        ConnectorStatus::Healthy
    }
}

/// Filter accepted by `list_connectors`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ConnectorStatus),
}

impl StatusFilter {
    pub const VALID: [&'static str; 5] = ["all", "failed", "healthy", "paused", "warning"];

    /// Parse an optional caller value; absent or empty means `all`, matching is case-insensitive.
    pub fn parse(raw: Option<&str>) -> Result<Self, FivetranError> {
        match raw.filter(|s| !s.is_empty()) {
            None => Ok(StatusFilter::All),
            Some(value) => value.parse(),
        }
    }

    pub fn matches(&self, status: ConnectorStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = FivetranError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "failed" => Ok(StatusFilter::Only(ConnectorStatus::Failed)),
            "healthy" => Ok(StatusFilter::Only(ConnectorStatus::Healthy)),
            "paused" => Ok(StatusFilter::Only(ConnectorStatus::Paused)),
            "warning" => Ok(StatusFilter::Only(ConnectorStatus::Warning)),
            _ => Err(invalid_status(s, &Self::VALID)),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

/// Online state of a hybrid deployment agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Live,
    Offline,
    Unknown,
}

impl AgentStatus {
    pub fn from_online(online: bool) -> Self {
        if online {
            AgentStatus::Live
        } else {
            AgentStatus::Offline
        }
    }
}

/// Filter accepted by `list_hybrid_agents`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentStatusFilter {
    #[default]
    All,
    Live,
    Offline,
}

impl AgentStatusFilter {
    pub const VALID: [&'static str; 3] = ["all", "live", "offline"];

    pub fn parse(raw: Option<&str>) -> Result<Self, FivetranError> {
        match raw.filter(|s| !s.is_empty()) {
            None => Ok(AgentStatusFilter::All),
            Some(value) => value.parse(),
        }
    }

    /// Only a concrete filter needs the per-agent detail fetch.
    pub fn requires_detail(&self) -> bool {
        !matches!(self, AgentStatusFilter::All)
    }

    pub fn matches(&self, status: AgentStatus) -> bool {
        match self {
            AgentStatusFilter::All => true,
            AgentStatusFilter::Live => status == AgentStatus::Live,
            AgentStatusFilter::Offline => status == AgentStatus::Offline,
        }
    }
}

impl FromStr for AgentStatusFilter {
    type Err = FivetranError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(AgentStatusFilter::All),
            "live" => Ok(AgentStatusFilter::Live),
            "offline" => Ok(AgentStatusFilter::Offline),
            _ => Err(invalid_status(s, &Self::VALID)),
        }
    }
}

impl fmt::Display for AgentStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AgentStatusFilter::All => "all",
            AgentStatusFilter::Live => "live",
            AgentStatusFilter::Offline => "offline",
        })
    }
}

fn invalid_status(value: &str, valid: &[&str]) -> FivetranError {
    FivetranError::Validation(format!(
        "Invalid status '{}'. Must be one of: {}",
        value,
        valid.join(", ")
    ))
}
