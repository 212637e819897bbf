pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod statements;
pub mod warehouse;

pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{seed_demo_requests, SeedResult};
pub use warehouse::{
    DmlOutcome, ParamKind, QueryParam, SqliteWarehouse, Statement, Warehouse, WarehouseError,
    WarehouseRow,
};
