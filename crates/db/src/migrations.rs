use travel_core::TableRef;

use crate::DbPool;

/// Creates the travel request table and its indexes when missing.
pub async fn run_pending(pool: &DbPool, table: &TableRef) -> Result<(), sqlx::Error> {
    for statement in schema_statements(table) {
        sqlx::query(&statement).execute(pool).await?;
    }

    tracing::info!(
        event_name = "db.migrations.applied",
        table = %table,
        "travel request schema is up to date"
    );
    Ok(())
}

pub fn schema_statements(table: &TableRef) -> Vec<String> {
    let quoted = table.quoted();
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {quoted} (
                request_id TEXT PRIMARY KEY NOT NULL,
                timestamp TEXT NOT NULL,
                employee_first_name TEXT,
                employee_last_name TEXT,
                employee_id TEXT,
                origin_city TEXT,
                destination_city TEXT,
                start_date TEXT,
                end_date TEXT,
                transport_mode TEXT,
                car_type TEXT,
                reason TEXT,
                status TEXT
            )"
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{name}_status ON {quoted} (status)",
            name = table.table
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{name}_timestamp ON {quoted} (timestamp)",
            name = table.table
        ),
    ]
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use travel_core::TableRef;

    use super::run_pending;
    use crate::connect_with_settings;

    fn table() -> TableRef {
        TableRef::new("fon-test-project", "foncorp_travel_data", "travel_requests")
    }

    #[tokio::test]
    async fn creates_the_request_table_and_indexes() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool, &table()).await.expect("run migrations");

        let names: Vec<String> = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'index') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .expect("load schema objects")
        .into_iter()
        .map(|row| row.get::<String, _>("name"))
        .collect();

        assert!(names.contains(&"fon-test-project.foncorp_travel_data.travel_requests".to_string()));
        assert!(names.contains(&"idx_travel_requests_status".to_string()));
        assert!(names.contains(&"idx_travel_requests_timestamp".to_string()));
    }

    #[tokio::test]
    async fn rerunning_is_a_no_op() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool, &table()).await.expect("first run");
        run_pending(&pool, &table()).await.expect("second run");
    }
}
