use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::JsonObject;
use rmcp::ServerHandler;
use serde_json::{json, Value};

use travel_agent::{Tool, ToolsetError, ToolsetLoader};
use travel_core::config::AppConfig;
use travel_mcp::{bootstrap_with_config, bootstrap_with_loader, BootstrapError, TravelMcpServer};

fn memory_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    config
}

fn arguments(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

async fn server() -> TravelMcpServer {
    let app = bootstrap_with_config(memory_config()).await.expect("bootstrap");
    TravelMcpServer::new(app.runtime)
}

#[tokio::test]
async fn lists_the_three_travel_tools_with_schemas() {
    let server = server().await;
    let tools = server.tool_descriptors();

    let names: Vec<&str> = tools.iter().map(|tool| tool.name.as_ref()).collect();
    assert_eq!(
        names,
        [
            "get_travel_requests_by_status",
            "request_travel_booking_logic",
            "update_travel_request_status"
        ]
    );
    let update = &tools[2];
    assert_eq!(update.input_schema.get("required"), Some(&json!(["request_id", "new_status"])));
}

#[tokio::test]
async fn server_info_publishes_the_instruction() {
    let server = server().await;
    let info = server.get_info();

    assert_eq!(info.server_info.name, "travel-mcp");
    let instructions = info.instructions.expect("instructions");
    assert!(instructions.contains("fon-test-project.foncorp_travel_data.travel_requests"));
    assert!(!instructions.contains("execute_sql_tool"));
}

#[tokio::test]
async fn tool_calls_return_text_and_json_payloads() {
    let server = server().await;

    let unrecognized = server
        .invoke("get_travel_requests_by_status", arguments(json!({ "search_term": "xyz" })))
        .await
        .expect("known tool");
    assert!(!unrecognized.is_error);
    let payload: Value = serde_json::from_str(&unrecognized.text).expect("json payload");
    assert!(payload.get("error").is_some());
    assert!(payload.get("requests").is_none());

    let missing = server
        .invoke(
            "update_travel_request_status",
            arguments(json!({ "request_id": "nope", "new_status": "Cancelada" })),
        )
        .await
        .expect("known tool");
    assert_eq!(missing.text, "No se encontró solicitud con ID 'nope'.");

    assert!(server.invoke("list_tts_voices", None).await.is_none());
}

struct BrokenToolbox;

#[async_trait]
impl ToolsetLoader for BrokenToolbox {
    async fn load_toolset(&self, toolset: &str) -> Result<Vec<Arc<dyn Tool>>, ToolsetError> {
        Err(ToolsetError::Status {
            url: format!("http://toolbox/api/toolset/{toolset}"),
            status: 503,
        })
    }
}

struct EmptyToolbox;

#[async_trait]
impl ToolsetLoader for EmptyToolbox {
    async fn load_toolset(&self, _toolset: &str) -> Result<Vec<Arc<dyn Tool>>, ToolsetError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn toolset_failures_abort_startup() {
    let unavailable =
        bootstrap_with_loader(memory_config(), Some(&BrokenToolbox as &dyn ToolsetLoader)).await;
    assert!(matches!(
        unavailable,
        Err(BootstrapError::Toolset(ToolsetError::Status { status: 503, .. }))
    ));

    let incomplete =
        bootstrap_with_loader(memory_config(), Some(&EmptyToolbox as &dyn ToolsetLoader)).await;
    match incomplete {
        Err(BootstrapError::Toolset(ToolsetError::MissingTools { missing, .. })) => {
            assert_eq!(missing, ["execute_sql_tool"]);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("startup should fail without required tools"),
    }
}
