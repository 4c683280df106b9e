//! RMCP Server Adapter
//!
//! Exposes the Fivetran tools through the rmcp `ServerHandler` trait. Tool
//! outcomes, including Fivetran errors, are returned as a single JSON text
//! block; only an unknown tool name is a protocol-level error.

use crate::domain::ToolPort;
use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Fivetran MCP Server
#[derive(Clone)]
pub struct FivetranServer {
    tool_handler: Arc<dyn ToolPort>,
}

impl FivetranServer {
    pub fn new(tool_handler: Arc<dyn ToolPort>) -> Self {
        Self { tool_handler }
    }
}

impl ServerHandler for FivetranServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fivetran-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Fivetran MCP Server - inspect connectors, schema sync status, connector health and hybrid deployment agents"
                    .to_string(),
            ),
        }
    }

    fn ping(
        &self,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<(), McpError>> + Send + '_ {
        async move {
            info!("MCP ping received");
            Ok(())
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let handler = self.tool_handler.clone();
        async move {
            let tools = handler
                .list_tools()
                .await
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;

            let mcp_tools: Vec<Tool> = tools
                .into_iter()
                .map(|t| {
                    let schema = match t.input_schema {
                        serde_json::Value::Object(obj) => obj,
                        _ => serde_json::Map::new(),
                    };
                    Tool::new(t.name, t.description, schema)
                })
                .collect();

            Ok(ListToolsResult {
                tools: mcp_tools,
                next_cursor: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        let handler = self.tool_handler.clone();
        async move {
            let name = request.name.as_ref();
            let args = request
                .arguments
                .map(serde_json::Value::Object)
                .unwrap_or(serde_json::Value::Null);
            debug!(tool = name, "MCP tool call");

            let result = handler
                .execute_tool(name, args)
                .await
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

            Ok(CallToolResult::success(vec![Content::text(result.to_string())]))
        }
    }
}
