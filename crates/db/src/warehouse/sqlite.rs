use async_trait::async_trait;
use sqlx::{Column, Row};

use super::{DmlOutcome, QueryParam, Statement, Warehouse, WarehouseError, WarehouseRow};
use crate::DbPool;

/// Warehouse backed by a local SQLite database.
///
/// The table identifier keeps its backtick quoting, which SQLite accepts as a
/// single identifier, so `project.dataset.table` is one table name here.
#[derive(Clone)]
pub struct SqliteWarehouse {
    pool: DbPool,
}

impl SqliteWarehouse {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Rewrites `@name` placeholders to numbered `?N` ones.
///
/// Numbers follow first appearance; a repeated name reuses its number. The
/// returned parameters are in binding order. Text inside string literals and
/// quoted identifiers is left untouched.
pub fn rewrite_placeholders(
    statement: &Statement,
) -> Result<(String, Vec<&QueryParam>), WarehouseError> {
    let mut sql = String::with_capacity(statement.sql.len());
    let mut bound: Vec<&QueryParam> = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = statement.sql.chars().peekable();

    while let Some(ch) = chars.next() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            sql.push(ch);
            continue;
        }

        match ch {
            '\'' | '"' | '`' => {
                quote = Some(ch);
                sql.push(ch);
            }
            '@' if chars.peek().is_some_and(|next| next.is_ascii_alphabetic() || *next == '_') => {
                let mut name = String::new();
                while let Some(next) = chars.peek().copied() {
                    if !next.is_ascii_alphanumeric() && next != '_' {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }

                let position = match bound.iter().position(|param| param.name == name) {
                    Some(position) => position,
                    None => {
                        let param = statement
                            .param(&name)
                            .ok_or(WarehouseError::UnknownParameter { name: name.clone() })?;
                        bound.push(param);
                        bound.len() - 1
                    }
                };
                sql.push('?');
                sql.push_str(&(position + 1).to_string());
            }
            _ => sql.push(ch),
        }
    }

    Ok((sql, bound))
}

fn bind_all<'q>(
    sql: &'q str,
    params: &[&QueryParam],
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, param| query.bind(param.value.clone()))
}

/// Pool exhaustion and closed pools mean the warehouse cannot be reached.
fn connection_error(error: sqlx::Error) -> WarehouseError {
    match error {
        sqlx::Error::PoolTimedOut => {
            WarehouseError::Unavailable("timed out waiting for a connection".to_string())
        }
        sqlx::Error::PoolClosed => {
            WarehouseError::Unavailable("connection pool is closed".to_string())
        }
        other => WarehouseError::Database(other),
    }
}

#[async_trait]
impl Warehouse for SqliteWarehouse {
    async fn execute(&self, statement: Statement) -> Result<DmlOutcome, WarehouseError> {
        let (sql, params) = rewrite_placeholders(&statement)?;

        match bind_all(&sql, &params).execute(&self.pool).await {
            Ok(result) => Ok(DmlOutcome::rows(result.rows_affected())),
            Err(sqlx::Error::Database(error)) => {
                tracing::warn!(
                    event_name = "warehouse.dml_rejected",
                    error = %error,
                    "statement rejected by sqlite"
                );
                Ok(DmlOutcome { affected_rows: 0, errors: vec![error.message().to_string()] })
            }
            Err(error) => Err(connection_error(error)),
        }
    }

    async fn query(&self, statement: Statement) -> Result<Vec<WarehouseRow>, WarehouseError> {
        let (sql, params) = rewrite_placeholders(&statement)?;
        let rows =
            bind_all(&sql, &params).fetch_all(&self.pool).await.map_err(connection_error)?;

        rows.iter()
            .map(|row| {
                let mut decoded = WarehouseRow::new();
                for column in row.columns() {
                    let value = row
                        .try_get::<Option<String>, _>(column.ordinal())
                        .map_err(|error| {
                            WarehouseError::Decode(format!("column `{}`: {error}", column.name()))
                        })?;
                    decoded.insert(column.name(), value);
                }
                Ok(decoded)
            })
            .collect()
    }
}
