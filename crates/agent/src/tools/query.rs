use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use travel_core::{normalize_search_term, ToolError};
use travel_db::statements::select_by_status;
use travel_db::WarehouseRow;

use super::{missing_fields, parse_args, string_property, Tool, ToolContext};

pub const NAME: &str = "get_travel_requests_by_status";

/// Placeholder for columns the row does not carry.
pub const MISSING: &str = "N/A";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QueryArgs {
    pub search_term: Option<String>,
}

/// Wire shape consumed by the agent's response rules.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryPayload {
    Error {
        error: String,
    },
    Empty {
        search_term: String,
        count: usize,
        requests: Vec<RequestSummary>,
        message: String,
    },
    Found {
        search_term: String,
        count: usize,
        requests: Vec<RequestSummary>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestSummary {
    pub request_id: String,
    pub employee_name: String,
    pub origin_city: String,
    pub destination_city: String,
    pub start_date: String,
    pub end_date: String,
    pub transport_mode: String,
    pub car_type: Option<String>,
    pub reason: String,
    pub status: String,
}

impl RequestSummary {
    pub fn from_row(row: &WarehouseRow) -> Self {
        let value = |column: &str| row.get(column).filter(|value| !value.is_empty());
        let text = |column: &str| value(column).unwrap_or(MISSING).to_string();
        let employee_name = format!(
            "{} {}",
            value("employee_first_name").unwrap_or_default(),
            value("employee_last_name").unwrap_or_default()
        );
        let employee_name = match employee_name.trim() {
            "" => MISSING.to_string(),
            name => name.to_string(),
        };

        Self {
            request_id: text("request_id"),
            employee_name,
            origin_city: text("origin_city"),
            destination_city: text("destination_city"),
            start_date: text("start_date"),
            end_date: text("end_date"),
            transport_mode: text("transport_mode"),
            car_type: value("car_type").map(str::to_string),
            reason: text("reason"),
            status: text("status"),
        }
    }
}

pub struct GetTravelRequestsByStatusTool {
    context: ToolContext,
}

impl GetTravelRequestsByStatusTool {
    pub fn new(context: ToolContext) -> Self {
        Self { context }
    }

    pub async fn search(&self, args: QueryArgs) -> QueryPayload {
        if let Some(error) = missing_fields(&[("search_term", &args.search_term)]) {
            return QueryPayload::Error { error: error.to_string() };
        }
        let search_term = args.search_term.unwrap_or_default();

        let Some(matched) = normalize_search_term(&search_term) else {
            tracing::info!(
                event_name = "tool.query.unrecognized",
                tool = NAME,
                search_term = %search_term,
                "search term not interpreted"
            );
            let error = ToolError::UnrecognizedSearchTerm { term: search_term };
            return QueryPayload::Error { error: error.to_string() };
        };

        let statement = select_by_status(&self.context.table, &matched);
        let rows = match self.context.warehouse.query(statement).await {
            Ok(rows) => rows,
            Err(error) => {
                tracing::error!(
                    event_name = "tool.query.transport_error",
                    tool = NAME,
                    search_term = %search_term,
                    error = %error,
                    "travel request query failed"
                );
                return QueryPayload::Error {
                    error: format!("Error técnico al consultar las solicitudes de viaje: {error}."),
                };
            }
        };

        if rows.is_empty() {
            tracing::info!(
                event_name = "tool.query.empty",
                tool = NAME,
                search_term = %search_term,
                "no travel requests matched"
            );
            let message =
                format!("No se encontraron solicitudes de viaje para el término: '{search_term}'.");
            return QueryPayload::Empty { search_term, count: 0, requests: Vec::new(), message };
        }

        let requests: Vec<RequestSummary> = rows.iter().map(RequestSummary::from_row).collect();
        tracing::info!(
            event_name = "tool.query.found",
            tool = NAME,
            search_term = %search_term,
            count = requests.len(),
            "travel requests found"
        );
        QueryPayload::Found { search_term, count: requests.len(), requests }
    }
}

#[async_trait]
impl Tool for GetTravelRequestsByStatusTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Busca solicitudes de viaje por estado y devuelve el resultado como JSON."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "search_term": string_property(
                    "El estado o término de búsqueda para las solicitudes (ej. 'Cancelada', 'Pendiente', 'Registrada')."
                )
            },
            "required": ["search_term"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let payload = match parse_args::<QueryArgs>(input) {
            Ok(args) => self.search(args).await,
            Err(error) => QueryPayload::Error { error },
        };
        Ok(serde_json::to_value(payload)?)
    }
}
