//! MCP protocol tests using the rmcp client over streamable HTTP.

use super::common;

use common::test_server::TestServer;
use rmcp::{
    model::{CallToolRequestParam, CallToolResult, ClientCapabilities, ClientInfo, Implementation},
    transport::StreamableHttpClientTransport,
    ServiceExt,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type Client = rmcp::service::RunningService<rmcp::RoleClient, rmcp::model::InitializeRequestParam>;

async fn create_client(server: &TestServer) -> Client {
    let transport = StreamableHttpClientTransport::from_uri(server.url("/mcp"));
    let client_info = ClientInfo {
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "integration-test-client".to_string(),
            title: None,
            version: "1.0.0".to_string(),
            website_url: None,
            icons: None,
        },
    };
    client_info.serve(transport).await.unwrap()
}

/// The JSON object carried by the single text block of a tool result
fn tool_payload(result: &CallToolResult) -> Value {
    let wire = serde_json::to_value(result).unwrap();
    let text = wire["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_initialize_reports_server_info() {
    let server = TestServer::new().await;
    let client = create_client(&server).await;

    let info = client.peer_info().unwrap();
    assert_eq!(info.server_info.name, "fivetran-mcp");
    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.resources.is_none());

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_list_tools() {
    let server = TestServer::new().await;
    let client = create_client(&server).await;

    let tools = client.list_tools(Default::default()).await.unwrap();

    assert_eq!(tools.tools.len(), 7);
    let diagnose = tools
        .tools
        .iter()
        .find(|t| t.name.as_ref() == "diagnose_connector")
        .unwrap();
    assert!(diagnose.input_schema.contains_key("properties"));

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_call_tool_without_credentials() {
    let server = TestServer::new().await;
    let client = create_client(&server).await;

    let result = client
        .call_tool(CallToolRequestParam {
            name: "list_connectors".into(),
            arguments: None,
        })
        .await
        .unwrap();

    let payload = tool_payload(&result);
    assert_eq!(payload["status"], "error");
    assert!(payload["error"].as_str().unwrap().contains("FIVETRAN_API_KEY"));

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_call_list_groups() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Success",
            "data": {
                "items": [{ "id": "g1", "name": "company-prod", "created_at": "2024-01-01T00:00:00Z" }],
                "next_cursor": null
            }
        })))
        .mount(&upstream)
        .await;

    let server = TestServer::with_upstream(&upstream.uri()).await;
    let client = create_client(&server).await;

    let result = client
        .call_tool(CallToolRequestParam {
            name: "list_groups".into(),
            arguments: None,
        })
        .await
        .unwrap();

    let payload = tool_payload(&result);
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["groups"][0]["name"], "company-prod");

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_call_tool_upstream_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/connectors/c1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&upstream)
        .await;

    let server = TestServer::with_upstream(&upstream.uri()).await;
    let client = create_client(&server).await;

    let result = client
        .call_tool(CallToolRequestParam {
            name: "get_sync_history".into(),
            arguments: json!({ "connector_id": "c1" }).as_object().cloned(),
        })
        .await
        .unwrap();

    let payload = tool_payload(&result);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["status_code"], 403);
    assert_eq!(payload["error"], "Access forbidden");

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_call_nonexistent_tool() {
    let server = TestServer::new().await;
    let client = create_client(&server).await;

    let result = client
        .call_tool(CallToolRequestParam {
            name: "nonexistent_tool".into(),
            arguments: None,
        })
        .await;

    assert!(result.is_err(), "Calling nonexistent tool should fail");

    client.cancel().await.unwrap();
}
