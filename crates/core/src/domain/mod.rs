pub mod table;
pub mod travel_request;
