use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripBoundary {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TripDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("`{value}` is not a YYYY-MM-DD date")]
    InvalidFormat { value: String },
    #[error("{which:?} date {date} is in the past")]
    PastDate { which: TripBoundary, date: String },
    #[error("end date {end} precedes start date {start}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

pub fn parse_date(value: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| DateError::InvalidFormat { value: value.to_string() })
}

/// Checks a trip's dates against `today` and against each other.
///
/// Both dates are parsed before any range check, so a malformed end date is
/// reported as a format problem even when the start date is already past.
pub fn validate_trip_dates(
    start: &str,
    end: &str,
    today: NaiveDate,
) -> Result<TripDates, DateError> {
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;

    if start_date < today {
        return Err(DateError::PastDate { which: TripBoundary::Start, date: start.to_string() });
    }
    if end_date < today {
        return Err(DateError::PastDate { which: TripBoundary::End, date: end.to_string() });
    }
    if end_date < start_date {
        return Err(DateError::InvertedRange { start: start_date, end: end_date });
    }

    Ok(TripDates { start: start_date, end: end_date })
}
