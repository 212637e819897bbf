pub mod clock;
pub mod config;
pub mod dates;
pub mod domain;
pub mod errors;
pub mod status;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dates::{validate_trip_dates, DateError, TripBoundary, TripDates};
pub use domain::table::TableRef;
pub use domain::travel_request::{RequestId, TravelRequest, TravelStatus};
pub use errors::ToolError;
pub use status::{normalize_search_term, resolve_target_status, MatchMode, StatusMatch};
