use clap::Parser;
use std::path::PathBuf;

/// Fivetran MCP Server - read-only Fivetran troubleshooting tools over the Model Context Protocol
#[derive(Parser, Debug, Clone)]
#[command(name = "fivetran-mcp", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "FIVETRAN_MCP_CONFIG", default_value = "fivetran-mcp.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "FIVETRAN_MCP_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "FIVETRAN_MCP_PORT")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "FIVETRAN_MCP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Fivetran API key
    #[arg(long, env = "FIVETRAN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Fivetran API secret
    #[arg(long, env = "FIVETRAN_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Fivetran API base URL
    #[arg(long, env = "FIVETRAN_BASE_URL")]
    pub base_url: Option<String>,

    /// Fivetran request timeout in seconds
    #[arg(long, env = "FIVETRAN_TIMEOUT_SECONDS")]
    pub timeout_seconds: Option<u64>,
}

impl Cli {
    /// Parse the configured log level, falling back to `info` for unknown values
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
