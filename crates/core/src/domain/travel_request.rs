use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle label of a travel request. Labels are stored in the warehouse
/// in their Spanish form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelStatus {
    Registered,
    PendingApproval,
    Approved,
    Rejected,
    Booked,
    Completed,
    Cancelled,
}

impl TravelStatus {
    pub const ALL: [TravelStatus; 7] = [
        Self::Registered,
        Self::PendingApproval,
        Self::Approved,
        Self::Rejected,
        Self::Booked,
        Self::Completed,
        Self::Cancelled,
    ];

    pub const TERMINAL: [TravelStatus; 5] =
        [Self::Approved, Self::Rejected, Self::Booked, Self::Completed, Self::Cancelled];

    pub const INITIAL: TravelStatus = Self::Registered;

    pub fn label(&self) -> &'static str {
        match self {
            Self::Registered => "Registrada",
            Self::PendingApproval => "Pendiente de Aprobación",
            Self::Approved => "Aprobada",
            Self::Rejected => "Rechazada",
            Self::Booked => "Reservada",
            Self::Completed => "Completada",
            Self::Cancelled => "Cancelada",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }

    /// Comma separated list of every label, in lifecycle order.
    pub fn label_list() -> String {
        Self::ALL.iter().map(TravelStatus::label).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for TravelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelRequest {
    pub id: RequestId,
    pub timestamp: DateTime<Utc>,
    pub employee_first_name: String,
    pub employee_last_name: String,
    pub employee_id: String,
    pub origin_city: String,
    pub destination_city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub transport_mode: String,
    pub car_type: Option<String>,
    pub reason: String,
    pub status: TravelStatus,
}

impl TravelRequest {
    pub fn employee_full_name(&self) -> String {
        format!("{} {}", self.employee_first_name, self.employee_last_name)
    }

    /// Car type only matters when the trip is made by car.
    pub fn travels_by_car(&self) -> bool {
        self.transport_mode.trim().to_lowercase() == "coche"
    }
}
