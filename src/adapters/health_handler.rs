use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adapters::tool_handler::FivetranToolHandler;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub config: String,
    pub fivetran_client: String,
}

pub struct HealthHandler {
    tool_handler: Arc<FivetranToolHandler>,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(tool_handler: Arc<FivetranToolHandler>) -> Self {
        Self {
            tool_handler,
            start_time: std::time::Instant::now(),
        }
    }

    fn client_check(&self) -> &'static str {
        if self.tool_handler.is_configured() {
            "ok"
        } else {
            "missing_credentials"
        }
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            checks: HealthChecks {
                config: "ok".to_string(),
                fivetran_client: self.client_check().to_string(),
            },
        };

        (StatusCode::OK, Json(status))
    }

    /// Readiness check - 503 until Fivetran credentials are configured
    pub async fn ready(&self) -> impl IntoResponse {
        if self.tool_handler.is_configured() {
            (StatusCode::OK, Json(serde_json::json!({
                "status": "ready",
                "message": "Server is ready to accept requests"
            })))
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({
                "status": "not_ready",
                "message": "Fivetran API credentials are not configured"
            })))
        }
    }

    /// Liveness check - returns 200 if server is alive
    pub async fn live(&self) -> impl IntoResponse {
        (StatusCode::OK, Json(serde_json::json!({
            "status": "alive",
            "message": "Server is alive"
        })))
    }
}
