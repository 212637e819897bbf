use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use travel_core::{resolve_target_status, ToolError, TravelStatus};
use travel_db::statements::{select_status_by_id, update_status};
use travel_db::WarehouseError;

use super::{missing_fields, parse_args, present, string_property, Tool, ToolContext};

pub const NAME: &str = "update_travel_request_status";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateArgs {
    pub request_id: Option<String>,
    pub new_status: Option<String>,
}

/// Moves a request to any status; transitions are not restricted.
pub struct UpdateTravelRequestStatusTool {
    context: ToolContext,
}

impl UpdateTravelRequestStatusTool {
    pub fn new(context: ToolContext) -> Self {
        Self { context }
    }

    async fn update(&self, args: UpdateArgs) -> String {
        if let Some(error) =
            missing_fields(&[("request_id", &args.request_id), ("new_status", &args.new_status)])
        {
            return error.to_string();
        }
        let request_id = present(&args.request_id).unwrap_or_default().to_string();
        let requested = args.new_status.unwrap_or_default();

        let status = match resolve_target_status(&requested) {
            Ok(status) => status,
            Err(error) => {
                tracing::info!(
                    event_name = "tool.update.invalid_status",
                    tool = NAME,
                    request_id = %request_id,
                    requested = %requested,
                    "requested status not recognized"
                );
                return error.to_string();
            }
        };

        match self.apply(&request_id, status).await {
            Ok(Ok(message)) => message,
            Ok(Err(error)) => {
                tracing::info!(
                    event_name = "tool.update.not_applied",
                    tool = NAME,
                    request_id = %request_id,
                    error_class = error.class(),
                    "status update not applied"
                );
                error.to_string()
            }
            Err(error) => {
                tracing::error!(
                    event_name = "tool.update.transport_error",
                    tool = NAME,
                    request_id = %request_id,
                    error = %error,
                    "status update failed"
                );
                format!("Error técnico al actualizar estado de '{request_id}': {error}")
            }
        }
    }

    async fn apply(
        &self,
        request_id: &str,
        status: TravelStatus,
    ) -> Result<Result<String, ToolError>, WarehouseError> {
        let statement =
            update_status(&self.context.table, request_id, status, self.context.clock.now());
        let outcome = self.context.warehouse.execute(statement).await?;

        if !outcome.errors.is_empty() {
            return Err(WarehouseError::Rejected(outcome.errors.join("; ")));
        }

        match outcome.affected_rows {
            1 => {
                tracing::info!(
                    event_name = "tool.update.applied",
                    tool = NAME,
                    request_id = %request_id,
                    status = %status,
                    "travel request status updated"
                );
                Ok(Ok(format!("Solicitud ID '{request_id}' actualizada a '{status}'.")))
            }
            0 => {
                let rows = self
                    .context
                    .warehouse
                    .query(select_status_by_id(&self.context.table, request_id))
                    .await?;
                let request_id = request_id.to_string();
                let error = match rows.first() {
                    None => ToolError::NotFound { request_id },
                    Some(row) if row.get("status") == Some(status.label()) => {
                        ToolError::NoOpAlreadySet { request_id, status }
                    }
                    Some(_) => ToolError::UnknownFailure { request_id },
                };
                Ok(Err(error))
            }
            affected => Err(WarehouseError::Rejected(format!(
                "se actualizaron {affected} filas para un único identificador"
            ))),
        }
    }
}

#[async_trait]
impl Tool for UpdateTravelRequestStatusTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Actualiza el estado de una solicitud de viaje específica."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "request_id": string_property("ID de la solicitud a actualizar."),
                "new_status": string_property("Nuevo estado para la solicitud.")
            },
            "required": ["request_id", "new_status"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let message = match parse_args::<UpdateArgs>(input) {
            Ok(args) => self.update(args).await,
            Err(message) => message,
        };
        Ok(Value::String(message))
    }
}
