use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use crate::instruction::{render_instruction, InstructionError};
use crate::tools::{render_output, travel_tools, Tool, ToolContext, ToolRegistry};

pub const AGENT_NAME: &str = "root_agent";
pub const AGENT_DESCRIPTION: &str =
    "Agente para gestionar solicitudes de viaje: registrar, consultar y actualizar estados.";

/// Remote tool the instruction points free-form questions at.
pub const SQL_TOOL: &str = "execute_sql_tool";

/// Instruction text plus every tool the agent host may call.
pub struct AgentRuntime {
    instruction: String,
    registry: ToolRegistry,
}

impl AgentRuntime {
    pub fn new(instruction: String, registry: ToolRegistry) -> Self {
        Self { instruction, registry }
    }

    /// Local travel tools take precedence over remote tools with the same name.
    pub fn build(
        context: ToolContext,
        remote_tools: Vec<Arc<dyn Tool>>,
    ) -> Result<Self, InstructionError> {
        let sql_tool = remote_tools.iter().any(|tool| tool.name() == SQL_TOOL).then_some(SQL_TOOL);
        let instruction = render_instruction(context.clock.today(), &context.table, sql_tool)?;

        let mut registry = ToolRegistry::default();
        for tool in remote_tools {
            registry.register_shared(tool);
        }
        let local = travel_tools(context);
        for name in local.names() {
            if let Some(tool) = local.get(&name) {
                registry.register_shared(tool);
            }
        }

        tracing::info!(
            event_name = "agent.runtime.ready",
            agent = AGENT_NAME,
            tools = ?registry.names(),
            "agent runtime assembled"
        );
        Ok(Self::new(instruction, registry))
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn call_tool(&self, name: &str, input: Value) -> Result<Value> {
        tracing::debug!(event_name = "agent.tool.call", tool = name, "dispatching tool call");
        self.registry.dispatch(name, input).await
    }

    /// Tool output as the text relayed to the agent host.
    pub async fn call_tool_text(&self, name: &str, input: Value) -> Result<String> {
        self.call_tool(name, input).await.map(|value| render_output(&value))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use travel_db::DmlOutcome;

    use super::AgentRuntime;
    use crate::tools::testing::{context, ScriptedWarehouse};
    use crate::tools::Tool;

    struct EchoTool(&'static str);

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "remote"
        }

        fn parameters(&self) -> Value {
            json!({ "type": "object" })
        }

        async fn execute(&self, input: Value) -> Result<Value> {
            Ok(json!({ "echo": input }))
        }
    }

    #[tokio::test]
    async fn local_tools_shadow_remote_ones() {
        let warehouse = Arc::new(ScriptedWarehouse::executing(DmlOutcome::rows(1)));
        let runtime = AgentRuntime::build(
            context(warehouse),
            vec![
                Arc::new(EchoTool("execute_sql_tool")) as Arc<dyn Tool>,
                Arc::new(EchoTool("update_travel_request_status")) as Arc<dyn Tool>,
            ],
        )
        .expect("runtime");

        assert_eq!(
            runtime.registry().names(),
            [
                "execute_sql_tool",
                "get_travel_requests_by_status",
                "request_travel_booking_logic",
                "update_travel_request_status"
            ]
        );
        let text = runtime
            .call_tool_text(
                "update_travel_request_status",
                json!({ "request_id": "r-1", "new_status": "Aprobada" }),
            )
            .await
            .expect("dispatch");
        assert_eq!(text, "Solicitud ID 'r-1' actualizada a 'Aprobada'.");
        assert!(runtime.instruction().contains("'execute_sql_tool'"));
    }

    #[tokio::test]
    async fn unknown_tools_are_an_error() {
        let warehouse = Arc::new(ScriptedWarehouse::executing(DmlOutcome::rows(1)));
        let runtime = AgentRuntime::build(context(warehouse), Vec::new()).expect("runtime");

        let error = runtime.call_tool("list_tts_voices", json!({})).await.expect_err("unknown");
        assert_eq!(error.to_string(), "unknown tool `list_tts_voices`");
    }
}
