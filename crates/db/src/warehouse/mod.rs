//! Parameterized access to the table holding travel requests.
//!
//! Statements are written in the warehouse dialect: named `@param`
//! placeholders and a backtick-quoted `project.dataset.table` identifier.
//! Adapters translate them to whatever their engine accepts.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use travel_core::dates::DATE_FORMAT;

pub mod sqlite;

pub use sqlite::SqliteWarehouse;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamKind {
    String,
    Date,
    Timestamp,
}

/// A typed scalar parameter. Values travel as text in their canonical form:
/// `YYYY-MM-DD` for dates and RFC 3339 UTC with microseconds for timestamps,
/// so both sort lexicographically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryParam {
    pub name: String,
    pub kind: ParamKind,
    pub value: Option<String>,
}

impl QueryParam {
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ParamKind::String, value: Some(value.into()) }
    }

    pub fn optional_string(name: impl Into<String>, value: Option<&str>) -> Self {
        Self { name: name.into(), kind: ParamKind::String, value: value.map(str::to_string) }
    }

    pub fn date(name: impl Into<String>, value: NaiveDate) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Date,
            value: Some(value.format(DATE_FORMAT).to_string()),
        }
    }

    pub fn timestamp(name: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Timestamp,
            value: Some(value.to_rfc3339_opts(SecondsFormat::Micros, true)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<QueryParam>) -> Self {
        Self { sql: sql.into(), params }
    }

    pub fn param(&self, name: &str) -> Option<&QueryParam> {
        self.params.iter().find(|param| param.name == name)
    }
}

/// One result row, keyed by column name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WarehouseRow {
    columns: BTreeMap<String, Option<String>>,
}

impl WarehouseRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: Option<&str>) -> Self {
        self.insert(column, value.map(str::to_string));
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.columns.insert(column.into(), value);
    }

    /// `None` both for SQL NULL and for a column the row does not carry.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).and_then(|value| value.as_deref())
    }
}

/// Result of a DML statement. `errors` holds engine-reported problems with
/// the statement itself, as opposed to a failure to reach the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DmlOutcome {
    pub affected_rows: u64,
    pub errors: Vec<String>,
}

impl DmlOutcome {
    pub fn rows(affected_rows: u64) -> Self {
        Self { affected_rows, errors: Vec::new() }
    }
}

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("statement references undeclared parameter `@{name}`")]
    UnknownParameter { name: String },
    #[error("statement rejected: {0}")]
    Rejected(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("warehouse unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn execute(&self, statement: Statement) -> Result<DmlOutcome, WarehouseError>;
    async fn query(&self, statement: Statement) -> Result<Vec<WarehouseRow>, WarehouseError>;
}
