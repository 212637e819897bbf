use chrono::{DateTime, Duration, NaiveDate, Utc};

use travel_core::{RequestId, TableRef, TravelRequest, TravelStatus};

use crate::statements::{insert_request, select_status_by_id};
use crate::warehouse::{Warehouse, WarehouseError};

/// Demo requests covering every lifecycle status.
const DEMO_REQUESTS: &[DemoRequest] = &[
    DemoRequest {
        request_id: "demo-registrada-001",
        status: TravelStatus::Registered,
        first_name: "Lucía",
        last_name: "García",
        employee_id: "EMP-1001",
        origin_city: "Madrid",
        destination_city: "Barcelona",
        start_offset_days: 7,
        duration_days: 2,
        transport_mode: "Tren",
        car_type: None,
        reason: "Reunión con cliente",
        hours_ago: 1,
    },
    DemoRequest {
        request_id: "demo-pendiente-001",
        status: TravelStatus::PendingApproval,
        first_name: "Javier",
        last_name: "Martín",
        employee_id: "EMP-1002",
        origin_city: "Sevilla",
        destination_city: "Valencia",
        start_offset_days: 14,
        duration_days: 3,
        transport_mode: "Coche",
        car_type: Some("Eléctrico"),
        reason: "Formación interna",
        hours_ago: 2,
    },
    DemoRequest {
        request_id: "demo-aprobada-001",
        status: TravelStatus::Approved,
        first_name: "Marta",
        last_name: "López",
        employee_id: "EMP-1003",
        origin_city: "Bilbao",
        destination_city: "Madrid",
        start_offset_days: 10,
        duration_days: 1,
        transport_mode: "Avión",
        car_type: None,
        reason: "Comité de dirección",
        hours_ago: 3,
    },
    DemoRequest {
        request_id: "demo-rechazada-001",
        status: TravelStatus::Rejected,
        first_name: "Carlos",
        last_name: "Ruiz",
        employee_id: "EMP-1004",
        origin_city: "Zaragoza",
        destination_city: "Lisboa",
        start_offset_days: 21,
        duration_days: 5,
        transport_mode: "Avión",
        car_type: None,
        reason: "Congreso sectorial",
        hours_ago: 4,
    },
    DemoRequest {
        request_id: "demo-reservada-001",
        status: TravelStatus::Booked,
        first_name: "Ana",
        last_name: "Fernández",
        employee_id: "EMP-1005",
        origin_city: "Málaga",
        destination_city: "Granada",
        start_offset_days: 3,
        duration_days: 1,
        transport_mode: "Coche",
        car_type: Some("Gasolina"),
        reason: "Visita a obra",
        hours_ago: 5,
    },
    DemoRequest {
        request_id: "demo-completada-001",
        status: TravelStatus::Completed,
        first_name: "Pablo",
        last_name: "Sánchez",
        employee_id: "EMP-1006",
        origin_city: "Madrid",
        destination_city: "París",
        start_offset_days: -20,
        duration_days: 4,
        transport_mode: "Avión",
        car_type: None,
        reason: "Feria internacional",
        hours_ago: 6,
    },
    DemoRequest {
        request_id: "demo-cancelada-001",
        status: TravelStatus::Cancelled,
        first_name: "Elena",
        last_name: "Moreno",
        employee_id: "EMP-1007",
        origin_city: "Valencia",
        destination_city: "Alicante",
        start_offset_days: 5,
        duration_days: 1,
        transport_mode: "Autobús",
        car_type: None,
        reason: "Auditoría",
        hours_ago: 7,
    },
];

struct DemoRequest {
    request_id: &'static str,
    status: TravelStatus,
    first_name: &'static str,
    last_name: &'static str,
    employee_id: &'static str,
    origin_city: &'static str,
    destination_city: &'static str,
    start_offset_days: i64,
    duration_days: i64,
    transport_mode: &'static str,
    car_type: Option<&'static str>,
    reason: &'static str,
    hours_ago: i64,
}

impl DemoRequest {
    fn to_request(&self, today: NaiveDate, now: DateTime<Utc>) -> TravelRequest {
        let start_date = today + Duration::days(self.start_offset_days);
        TravelRequest {
            id: RequestId(self.request_id.to_string()),
            timestamp: now - Duration::hours(self.hours_ago),
            employee_first_name: self.first_name.to_string(),
            employee_last_name: self.last_name.to_string(),
            employee_id: self.employee_id.to_string(),
            origin_city: self.origin_city.to_string(),
            destination_city: self.destination_city.to_string(),
            start_date,
            end_date: start_date + Duration::days(self.duration_days),
            transport_mode: self.transport_mode.to_string(),
            car_type: self.car_type.map(str::to_string),
            reason: self.reason.to_string(),
            status: self.status,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub inserted: Vec<String>,
    pub skipped: Vec<String>,
}

pub fn demo_request_ids() -> Vec<&'static str> {
    DEMO_REQUESTS.iter().map(|demo| demo.request_id).collect()
}

/// Inserts the demo requests that are not already present.
pub async fn seed_demo_requests(
    warehouse: &dyn Warehouse,
    table: &TableRef,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<SeedResult, WarehouseError> {
    let mut result = SeedResult::default();

    for demo in DEMO_REQUESTS {
        let existing = warehouse.query(select_status_by_id(table, demo.request_id)).await?;
        if !existing.is_empty() {
            result.skipped.push(demo.request_id.to_string());
            continue;
        }

        let outcome = warehouse.execute(insert_request(table, &demo.to_request(today, now))).await?;
        if !outcome.errors.is_empty() {
            return Err(WarehouseError::Rejected(format!(
                "demo request `{}` was rejected: {}",
                demo.request_id,
                outcome.errors.join("; ")
            )));
        }
        result.inserted.push(demo.request_id.to_string());
    }

    tracing::info!(
        event_name = "db.fixtures.seeded",
        inserted = result.inserted.len(),
        skipped = result.skipped.len(),
        "demo travel requests seeded"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{NaiveDate, TimeZone, Utc};
    use sqlx::Row;

    use travel_core::{TableRef, TravelStatus};

    use super::{demo_request_ids, seed_demo_requests};
    use crate::{connect_with_settings, migrations, SqliteWarehouse};

    #[tokio::test]
    async fn seeds_every_status_once() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        let table = TableRef::new("fon-test-project", "foncorp_travel_data", "travel_requests");
        migrations::run_pending(&pool, &table).await.expect("migrate");
        let warehouse = SqliteWarehouse::new(pool.clone());
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).expect("date");
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).single().expect("timestamp");

        let first = seed_demo_requests(&warehouse, &table, today, now).await.expect("seed");
        assert_eq!(first.inserted.len(), demo_request_ids().len());
        assert!(first.skipped.is_empty());

        let second = seed_demo_requests(&warehouse, &table, today, now).await.expect("reseed");
        assert!(second.inserted.is_empty());
        assert_eq!(second.skipped.len(), demo_request_ids().len());

        let statuses: HashSet<String> =
            sqlx::query(&format!("SELECT status FROM {}", table.quoted()))
                .fetch_all(&pool)
                .await
                .expect("load statuses")
                .into_iter()
                .map(|row| row.get::<String, _>("status"))
                .collect();
        for status in TravelStatus::ALL {
            assert!(statuses.contains(status.label()), "missing seeded status {status}");
        }
    }
}
