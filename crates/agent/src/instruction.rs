use chrono::{Datelike, NaiveDate};
use tera::{Context, Tera};
use thiserror::Error;

use travel_core::dates::DATE_FORMAT;
use travel_core::{TableRef, TravelStatus};

use crate::tools::{booking, query, update};

const TEMPLATE_NAME: &str = "system_instruction.txt";
const TEMPLATE: &str = include_str!("../templates/system_instruction.txt");

#[derive(Debug, Error)]
pub enum InstructionError {
    #[error("system instruction template failed: {0}")]
    Template(#[from] tera::Error),
}

/// Renders the agent's system instruction for `today`.
///
/// `sql_tool` names the remote free-form SQL tool; its section is left out
/// when no such tool was loaded.
pub fn render_instruction(
    today: NaiveDate,
    table: &TableRef,
    sql_tool: Option<&str>,
) -> Result<String, InstructionError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

    let mut context = Context::new();
    context.insert("today", &today.format(DATE_FORMAT).to_string());
    context.insert("current_year", &today.year());
    context.insert("table_id", &table.qualified());
    context.insert("booking_tool", booking::NAME);
    context.insert("query_tool", query::NAME);
    context.insert("update_tool", update::NAME);
    context.insert("statuses", &TravelStatus::label_list());
    context.insert("sql_tool", sql_tool.unwrap_or_default());

    Ok(tera.render(TEMPLATE_NAME, &context)?)
}
