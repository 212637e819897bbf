use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use travel_core::{Clock, TableRef, ToolError};
use travel_db::Warehouse;

pub mod booking;
pub mod query;
pub mod update;

pub use booking::RequestTravelBookingTool;
pub use query::GetTravelRequestsByStatusTool;
pub use update::UpdateTravelRequestStatusTool;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema of the arguments object.
    fn parameters(&self) -> Value;
    async fn execute(&self, input: Value) -> Result<Value>;
}

/// What the travel tools need from the outside world.
#[derive(Clone)]
pub struct ToolContext {
    pub warehouse: Arc<dyn Warehouse>,
    pub table: TableRef,
    pub clock: Arc<dyn Clock>,
}

#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.register_shared(Arc::new(tool));
    }

    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn dispatch(&self, name: &str, input: Value) -> Result<Value> {
        let tool = self.get(name).ok_or_else(|| anyhow!("unknown tool `{name}`"))?;
        tool.execute(input).await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Registry holding the three travel request tools.
pub fn travel_tools(context: ToolContext) -> ToolRegistry {
    let mut registry = ToolRegistry::default();
    registry.register(RequestTravelBookingTool::new(context.clone()));
    registry.register(GetTravelRequestsByStatusTool::new(context.clone()));
    registry.register(UpdateTravelRequestStatusTool::new(context));
    registry
}

/// Text handed back to the agent host: strings verbatim, anything else as
/// compact JSON.
pub fn render_output(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Decodes tool arguments. Every tool argument is text, so numbers and
/// booleans are taken in their JSON spelling; fields holding arrays or
/// objects are named in the error.
pub(crate) fn parse_args<T>(input: Value) -> std::result::Result<T, String>
where
    T: DeserializeOwned,
{
    let input = match input {
        Value::Null => Value::Object(Map::new()),
        Value::Object(fields) => Value::Object(
            fields.into_iter().map(|(name, value)| (name, scalar_as_text(value))).collect(),
        ),
        other => other,
    };

    let structured: Vec<String> = match &input {
        Value::Object(fields) => fields
            .iter()
            .filter(|(_, value)| value.is_array() || value.is_object())
            .map(|(name, _)| name.clone())
            .collect(),
        _ => Vec::new(),
    };

    serde_json::from_value(input).map_err(|error| {
        if structured.is_empty() {
            format!("Error de validación: {error}")
        } else {
            format!(
                "Error de validación: los campos {} deben ser texto.",
                structured.join(", ")
            )
        }
    })
}

fn scalar_as_text(value: Value) -> Value {
    match value {
        Value::Number(number) => Value::String(number.to_string()),
        Value::Bool(flag) => Value::String(flag.to_string()),
        other => other,
    }
}

pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Names of the fields that are absent or blank, in the order given.
pub(crate) fn missing_fields(fields: &[(&'static str, &Option<String>)]) -> Option<ToolError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(name, _)| *name)
        .collect();

    (!missing.is_empty()).then_some(ToolError::Validation { fields: missing })
}

pub(crate) fn string_property(description: &str) -> Value {
    serde_json::json!({ "type": "string", "description": description })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};

    use travel_core::{FixedClock, TableRef};
    use travel_db::{DmlOutcome, Statement, Warehouse, WarehouseError, WarehouseRow};

    use super::ToolContext;

    pub type Reply<T> = Box<dyn Fn() -> Result<T, WarehouseError> + Send + Sync>;

    /// Warehouse double that records statements and answers from fixed replies.
    pub struct ScriptedWarehouse {
        pub statements: Mutex<Vec<Statement>>,
        execute_reply: Reply<DmlOutcome>,
        query_reply: Reply<Vec<WarehouseRow>>,
    }

    impl ScriptedWarehouse {
        pub fn new(
            execute_reply: Reply<DmlOutcome>,
            query_reply: Reply<Vec<WarehouseRow>>,
        ) -> Self {
            Self { statements: Mutex::new(Vec::new()), execute_reply, query_reply }
        }

        pub fn executing(outcome: DmlOutcome) -> Self {
            Self::new(Box::new(move || Ok(outcome.clone())), Box::new(|| Ok(Vec::new())))
        }

        pub fn returning(rows: Vec<WarehouseRow>) -> Self {
            Self::new(Box::new(|| Ok(DmlOutcome::rows(0))), Box::new(move || Ok(rows.clone())))
        }

        pub fn recorded(&self) -> Vec<Statement> {
            self.statements.lock().map(|statements| statements.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Warehouse for ScriptedWarehouse {
        async fn execute(&self, statement: Statement) -> Result<DmlOutcome, WarehouseError> {
            if let Ok(mut statements) = self.statements.lock() {
                statements.push(statement);
            }
            (self.execute_reply)()
        }

        async fn query(&self, statement: Statement) -> Result<Vec<WarehouseRow>, WarehouseError> {
            if let Ok(mut statements) = self.statements.lock() {
                statements.push(statement);
            }
            (self.query_reply)()
        }
    }

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).expect("date")
    }

    pub fn context(warehouse: Arc<ScriptedWarehouse>) -> ToolContext {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).single().expect("timestamp");
        ToolContext {
            warehouse,
            table: TableRef::new("fon-test-project", "foncorp_travel_data", "travel_requests"),
            clock: Arc::new(FixedClock { now, today: today() }),
        }
    }
}
