use clap::Parser;
use fivetran_mcp::adapters::health_handler::HealthHandler;
use fivetran_mcp::adapters::rmcp_server::FivetranServer;
use fivetran_mcp::adapters::tool_handler::FivetranToolHandler;
use fivetran_mcp::cli::Cli;
use fivetran_mcp::config::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.tracing_level())
        .init();

    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting Fivetran MCP Server on {}:{}", host, port);
    info!("Fivetran API: {}", settings.fivetran.base_url);

    let tool_handler = Arc::new(FivetranToolHandler::from_settings(&settings.fivetran));
    if !tool_handler.is_configured() {
        warn!("Tools will report a configuration error until credentials are provided");
    }

    let health_handler = Arc::new(HealthHandler::new(tool_handler.clone()));
    let server = FivetranServer::new(tool_handler);

    let app = fivetran_mcp::create_app(server, health_handler);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    info!("MCP endpoint: http://{}/mcp", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
