use fivetran_mcp::adapters::{
    health_handler::HealthHandler, rmcp_server::FivetranServer, tool_handler::FivetranToolHandler,
};
use fivetran_mcp::config::FivetranSettings;
use std::net::SocketAddr;
use std::sync::Arc;

#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
}

impl TestServer {
    /// Server without Fivetran credentials
    pub async fn new() -> Self {
        Self::with_settings(FivetranSettings::default()).await
    }

    /// Server whose Fivetran client talks to `upstream` (a wiremock URI)
    pub async fn with_upstream(upstream: &str) -> Self {
        Self::with_settings(FivetranSettings {
            base_url: format!("{}/v1", upstream),
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
            timeout_seconds: 5,
            max_pages: 10,
        })
        .await
    }

    async fn with_settings(settings: FivetranSettings) -> Self {
        let tool_handler = Arc::new(FivetranToolHandler::from_settings(&settings));
        let health_handler = Arc::new(HealthHandler::new(tool_handler.clone()));
        let server = FivetranServer::new(tool_handler);

        let app = fivetran_mcp::create_app(server, health_handler);

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestServer { addr, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
