//! MCP server exposing the travel request tools over stdio.
//!
//! The agent host lists and calls tools through MCP; the system instruction
//! is published as the server's `instructions`.

pub mod bootstrap;
mod server;

pub use bootstrap::{
    bootstrap, bootstrap_with_config, bootstrap_with_loader, Application, BootstrapError,
};
pub use server::{ToolReply, TravelMcpServer};
