use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use travel_core::{validate_trip_dates, RequestId, ToolError, TravelRequest, TravelStatus};
use travel_db::statements::insert_request;

use super::{missing_fields, parse_args, present, string_property, Tool, ToolContext};

pub const NAME: &str = "request_travel_booking_logic";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookingArgs {
    pub employee_first_name: Option<String>,
    pub employee_last_name: Option<String>,
    pub employee_id: Option<String>,
    pub origin_city: Option<String>,
    pub destination_city: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub transport_mode: Option<String>,
    pub reason: Option<String>,
    pub car_type: Option<String>,
}

/// Registers a new travel request with status `Registrada`.
pub struct RequestTravelBookingTool {
    context: ToolContext,
}

impl RequestTravelBookingTool {
    pub fn new(context: ToolContext) -> Self {
        Self { context }
    }

    async fn register(&self, args: BookingArgs) -> String {
        if let Some(error) = missing_fields(&[
            ("employee_first_name", &args.employee_first_name),
            ("employee_last_name", &args.employee_last_name),
            ("employee_id", &args.employee_id),
            ("origin_city", &args.origin_city),
            ("destination_city", &args.destination_city),
            ("start_date", &args.start_date),
            ("end_date", &args.end_date),
            ("transport_mode", &args.transport_mode),
            ("reason", &args.reason),
        ]) {
            return rejected(error);
        }

        let required = |value: &Option<String>| present(value).unwrap_or_default().to_string();
        let dates = match validate_trip_dates(
            &required(&args.start_date),
            &required(&args.end_date),
            self.context.clock.today(),
        ) {
            Ok(dates) => dates,
            Err(error) => return rejected(ToolError::from(error)),
        };

        let request = TravelRequest {
            id: RequestId::generate(),
            timestamp: self.context.clock.now(),
            employee_first_name: required(&args.employee_first_name),
            employee_last_name: required(&args.employee_last_name),
            employee_id: required(&args.employee_id),
            origin_city: required(&args.origin_city),
            destination_city: required(&args.destination_city),
            start_date: dates.start,
            end_date: dates.end,
            transport_mode: required(&args.transport_mode),
            car_type: present(&args.car_type).map(str::to_string),
            reason: required(&args.reason),
            status: TravelStatus::INITIAL,
        };

        let statement = insert_request(&self.context.table, &request);
        match self.context.warehouse.execute(statement).await {
            Ok(outcome) if !outcome.errors.is_empty() => {
                let errors = outcome.errors.join("; ");
                tracing::warn!(
                    event_name = "tool.booking.dml_error",
                    tool = NAME,
                    request_id = %request.id,
                    errors = %errors,
                    "warehouse rejected travel request insert"
                );
                format!("Error al registrar la solicitud (DML): {errors}.")
            }
            Ok(outcome) if outcome.affected_rows == 1 => {
                tracing::info!(
                    event_name = "tool.booking.registered",
                    tool = NAME,
                    request_id = %request.id,
                    "travel request registered"
                );
                confirmation(&request)
            }
            Ok(outcome) if outcome.affected_rows == 0 => {
                tracing::warn!(
                    event_name = "tool.booking.no_rows",
                    tool = NAME,
                    request_id = %request.id,
                    "insert affected no rows"
                );
                "Error al registrar la solicitud: no se insertaron filas.".to_string()
            }
            Ok(outcome) => {
                tracing::warn!(
                    event_name = "tool.booking.unexpected_rows",
                    tool = NAME,
                    request_id = %request.id,
                    affected_rows = outcome.affected_rows,
                    "insert affected an unexpected number of rows"
                );
                format!(
                    "Error al registrar la solicitud: se esperaba 1 fila insertada y se obtuvieron {}.",
                    outcome.affected_rows
                )
            }
            Err(error) => {
                tracing::error!(
                    event_name = "tool.booking.transport_error",
                    tool = NAME,
                    request_id = %request.id,
                    error = %error,
                    "travel request insert failed"
                );
                format!("Error técnico al registrar la solicitud: {error}.")
            }
        }
    }
}

fn rejected(error: ToolError) -> String {
    tracing::info!(
        event_name = "tool.booking.rejected",
        tool = NAME,
        error_class = error.class(),
        "travel request not registered"
    );
    error.to_string()
}

fn confirmation(request: &TravelRequest) -> String {
    let car = match &request.car_type {
        Some(car_type) if request.travels_by_car() => format!(" ({car_type})"),
        _ => String::new(),
    };

    format!(
        "¡Solicitud registrada (DML)! ID: {}. Para {} (ID: {}) desde {} a {} ({} a {}), usando {}{}. Motivo: {}.",
        request.id,
        request.employee_full_name(),
        request.employee_id,
        request.origin_city,
        request.destination_city,
        request.start_date,
        request.end_date,
        request.transport_mode,
        car,
        request.reason
    )
}

#[async_trait]
impl Tool for RequestTravelBookingTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Registra una solicitud de reserva de viaje en la tabla de solicitudes."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "employee_first_name": string_property("Nombre del empleado (pila)."),
                "employee_last_name": string_property("Apellidos del empleado."),
                "employee_id": string_property("ID del empleado."),
                "origin_city": string_property("Ciudad de origen del viaje."),
                "destination_city": string_property("Ciudad de destino del viaje."),
                "start_date": string_property("Fecha de inicio del viaje en formato yyyy-MM-dd."),
                "end_date": string_property("Fecha de fin del viaje en formato yyyy-MM-dd."),
                "transport_mode": string_property("Medio de transporte preferido."),
                "reason": string_property("Motivo del viaje."),
                "car_type": string_property("Tipo de coche si es 'Coche' (Particular o Alquiler).")
            },
            "required": [
                "employee_first_name",
                "employee_last_name",
                "employee_id",
                "origin_city",
                "destination_city",
                "start_date",
                "end_date",
                "transport_mode",
                "reason"
            ]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let message = match parse_args::<BookingArgs>(input) {
            Ok(args) => self.register(args).await,
            Err(message) => message,
        };
        Ok(Value::String(message))
    }
}
