//! SQL for the travel request table.

use chrono::{DateTime, Utc};

use travel_core::{MatchMode, StatusMatch, TableRef, TravelRequest, TravelStatus};

use crate::warehouse::{QueryParam, Statement};

pub const QUERY_LIMIT: usize = 10;

pub const SELECT_COLUMNS: &[&str] = &[
    "request_id",
    "employee_first_name",
    "employee_last_name",
    "origin_city",
    "destination_city",
    "start_date",
    "end_date",
    "transport_mode",
    "car_type",
    "reason",
    "status",
];

pub fn insert_request(table: &TableRef, request: &TravelRequest) -> Statement {
    let sql = format!(
        "INSERT INTO {} (request_id, timestamp, employee_first_name, employee_last_name, \
         employee_id, origin_city, destination_city, start_date, end_date, transport_mode, \
         car_type, reason, status) VALUES (@request_id, @timestamp, @employee_first_name, \
         @employee_last_name, @employee_id, @origin_city, @destination_city, @start_date, \
         @end_date, @transport_mode, @car_type, @reason, @status)",
        table.quoted()
    );

    Statement::new(
        sql,
        vec![
            QueryParam::string("request_id", request.id.0.as_str()),
            QueryParam::timestamp("timestamp", request.timestamp),
            QueryParam::string("employee_first_name", request.employee_first_name.as_str()),
            QueryParam::string("employee_last_name", request.employee_last_name.as_str()),
            QueryParam::string("employee_id", request.employee_id.as_str()),
            QueryParam::string("origin_city", request.origin_city.as_str()),
            QueryParam::string("destination_city", request.destination_city.as_str()),
            QueryParam::date("start_date", request.start_date),
            QueryParam::date("end_date", request.end_date),
            QueryParam::string("transport_mode", request.transport_mode.as_str()),
            QueryParam::optional_string("car_type", request.car_type.as_deref()),
            QueryParam::string("reason", request.reason.as_str()),
            QueryParam::string("status", request.status.label()),
        ],
    )
}

/// Newest first, at most [`QUERY_LIMIT`] rows, any of the matched statuses.
pub fn select_by_status(table: &TableRef, matched: &StatusMatch) -> Statement {
    let mut conditions = Vec::with_capacity(matched.statuses.len());
    let mut params = Vec::with_capacity(matched.statuses.len());

    for (index, status) in matched.statuses.iter().enumerate() {
        let name = format!("status_param_{index}");
        conditions.push(match matched.mode {
            // SQLite's LOWER folds ASCII only, so `Ó` and `ó` still differ there.
            MatchMode::CaseInsensitive => format!("LOWER(status) = LOWER(@{name})"),
            MatchMode::Exact => format!("status = @{name}"),
        });
        params.push(QueryParam::string(name, status.label()));
    }

    let sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY timestamp DESC LIMIT {QUERY_LIMIT}",
        SELECT_COLUMNS.join(", "),
        table.quoted(),
        conditions.join(" OR ")
    );

    Statement::new(sql, params)
}

/// Rows already at `status` are left alone, so a repeat update affects zero
/// rows and keeps its timestamp.
pub fn update_status(
    table: &TableRef,
    request_id: &str,
    status: TravelStatus,
    now: DateTime<Utc>,
) -> Statement {
    let sql = format!(
        "UPDATE {} SET status = @new_status_param, timestamp = @timestamp_param \
         WHERE request_id = @request_id_param \
         AND (status IS NULL OR status != @new_status_param)",
        table.quoted()
    );

    Statement::new(
        sql,
        vec![
            QueryParam::string("new_status_param", status.label()),
            QueryParam::timestamp("timestamp_param", now),
            QueryParam::string("request_id_param", request_id),
        ],
    )
}

pub fn select_status_by_id(table: &TableRef, request_id: &str) -> Statement {
    let sql = format!(
        "SELECT status FROM {} WHERE request_id = @request_id_param",
        table.quoted()
    );
    Statement::new(sql, vec![QueryParam::string("request_id_param", request_id)])
}
