use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool as McpTool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use tracing::{info, warn};

use travel_agent::{render_output, AgentRuntime};

/// Text returned to the client for one tool call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolReply {
    pub text: String,
    pub is_error: bool,
}

#[derive(Clone)]
pub struct TravelMcpServer {
    runtime: Arc<AgentRuntime>,
}

impl TravelMcpServer {
    pub fn new(runtime: Arc<AgentRuntime>) -> Self {
        Self { runtime }
    }

    pub async fn run_stdio(self) -> anyhow::Result<()> {
        info!(event_name = "mcp.server.start", transport = "stdio", "starting MCP server");

        let service = self.serve(rmcp::transport::stdio()).await?;
        let _quit = service.waiting().await?;

        info!(event_name = "mcp.server.stopped", "MCP server shutdown complete");
        Ok(())
    }

    pub fn tool_descriptors(&self) -> Vec<McpTool> {
        let registry = self.runtime.registry();
        registry
            .names()
            .into_iter()
            .filter_map(|name| registry.get(&name))
            .map(|tool| {
                let schema = match tool.parameters() {
                    Value::Object(schema) => schema,
                    _ => JsonObject::new(),
                };
                McpTool::new(
                    tool.name().to_string(),
                    tool.description().to_string(),
                    Arc::new(schema),
                )
            })
            .collect()
    }

    /// `None` when no tool has that name.
    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> Option<ToolReply> {
        self.runtime.registry().get(name)?;

        let input = arguments.map(Value::Object).unwrap_or(Value::Null);
        let reply = match self.runtime.call_tool(name, input).await {
            Ok(value) => ToolReply { text: render_output(&value), is_error: false },
            Err(error) => {
                warn!(
                    event_name = "mcp.tool.failed",
                    tool = name,
                    error = %error,
                    "tool call failed"
                );
                ToolReply { text: error.to_string(), is_error: true }
            }
        };
        Some(reply)
    }
}

impl ServerHandler for TravelMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = "travel-mcp".to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info,
            instructions: Some(self.runtime.instruction().to_string()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tool_descriptors()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.invoke(&request.name, request.arguments).await {
            Some(ToolReply { text, is_error: false }) => {
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Some(ToolReply { text, is_error: true }) => {
                Ok(CallToolResult::error(vec![Content::text(text)]))
            }
            None => Err(ErrorData::invalid_params(format!("unknown tool `{}`", request.name), None)),
        }
    }
}
