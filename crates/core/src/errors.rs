use thiserror::Error;

use crate::dates::{DateError, TripBoundary};
use crate::domain::travel_request::TravelStatus;

/// Every failure a tool can report. The `Display` text is what the agent shell
/// relays to the employee, so it is written in Spanish.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("Error de validación: faltan o están vacíos los campos obligatorios: {}.", .fields.join(", "))]
    Validation { fields: Vec<&'static str> },
    #[error("Error en la herramienta: El formato de las fechas no es válido. Utiliza yyyy-MM-dd.")]
    InvalidFormat,
    #[error("Error en la herramienta: La fecha de {} '{date}' ya ha pasado.", boundary_label(.which))]
    PastDate { which: TripBoundary, date: String },
    #[error("Error en la herramienta: La fecha de fin no puede ser anterior a la fecha de inicio.")]
    InvertedRange,
    #[error("Error: '{requested}' no es un estado válido. Válidos: {}.", TravelStatus::label_list())]
    InvalidStatus { requested: String },
    #[error("No se encontró solicitud con ID '{request_id}'.")]
    NotFound { request_id: String },
    #[error(
        "La solicitud ID '{request_id}' ya estaba en estado '{status}'. No se realizaron cambios."
    )]
    NoOpAlreadySet { request_id: String, status: TravelStatus },
    #[error("No se pudo actualizar la solicitud ID '{request_id}'. Razón desconocida.")]
    UnknownFailure { request_id: String },
    #[error(
        "No pude interpretar el término de búsqueda de estado: '{term}'. Intenta usar uno de los estados conocidos ({}).",
        TravelStatus::label_list()
    )]
    UnrecognizedSearchTerm { term: String },
    #[error("{0}")]
    Transport(String),
}

impl ToolError {
    /// Stable machine-readable class, used in logs.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::InvalidFormat => "invalid_format",
            Self::PastDate { .. } => "past_date",
            Self::InvertedRange => "inverted_range",
            Self::InvalidStatus { .. } => "invalid_status",
            Self::NotFound { .. } => "not_found",
            Self::NoOpAlreadySet { .. } => "noop_already_set",
            Self::UnknownFailure { .. } => "unknown_failure",
            Self::UnrecognizedSearchTerm { .. } => "unrecognized_search_term",
            Self::Transport(_) => "transport_error",
        }
    }
}

fn boundary_label(which: &TripBoundary) -> &'static str {
    match which {
        TripBoundary::Start => "inicio",
        TripBoundary::End => "fin",
    }
}

impl From<DateError> for ToolError {
    fn from(value: DateError) -> Self {
        match value {
            DateError::InvalidFormat { .. } => Self::InvalidFormat,
            DateError::PastDate { which, date } => Self::PastDate { which, date },
            DateError::InvertedRange { .. } => Self::InvertedRange,
        }
    }
}
