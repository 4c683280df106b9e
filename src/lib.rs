//! # Fivetran MCP Server
//!
//! A Model Context Protocol server exposing read-only Fivetran troubleshooting
//! tools: connector listings, table-level schema status, connector health
//! diagnosis, sync history, groups and hybrid deployment agents.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clap::Parser;
//! use fivetran_mcp::cli::Cli;
//! use fivetran_mcp::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let cli = Cli::parse();
//!     let settings = Settings::new_with_cli(&cli)?;
//!     println!("{}:{}", settings.server.host, settings.server.port);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: Fivetran payload types, status classification, diagnosis, errors and ports
//! - **Adapters**: HTTP client, pagination, tool handlers, rmcp server, health endpoints
//! - **Config**: File and CLI configuration with validation

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::health_handler::HealthHandler;
use crate::adapters::rmcp_server::FivetranServer;
use axum::{routing::get, Router};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use std::sync::Arc;

/// Creates the Axum application router.
///
/// Health probes live under `/health`; the MCP streamable HTTP transport is
/// mounted at `/mcp`.
pub fn create_app(fivetran_server: FivetranServer, health_handler: Arc<HealthHandler>) -> Router {
    let session_manager = Arc::new(LocalSessionManager::default());
    let config = StreamableHttpServerConfig::default();
    let mcp_service = StreamableHttpService::new(
        move || Ok(fivetran_server.clone()),
        session_manager,
        config,
    );

    Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }))
        .nest_service("/mcp", mcp_service)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tool_handler::FivetranToolHandler;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        let tool_handler = Arc::new(FivetranToolHandler::unconfigured("missing credentials", 10));
        let health_handler = Arc::new(HealthHandler::new(tool_handler.clone()));
        create_app(FivetranServer::new(tool_handler), health_handler)
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_route_without_credentials() {
        let response = app()
            .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
