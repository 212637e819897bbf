//! Travel request tools and the runtime that hands them to an agent host.
//!
//! The host supplies the language model and decides when to call a tool.
//! This crate owns the tool contracts:
//! - `request_travel_booking_logic` registers a request
//! - `get_travel_requests_by_status` lists requests by status
//! - `update_travel_request_status` moves a request to a new status
//!
//! Every tool reports failures as text or a JSON payload; nothing past the
//! tool boundary sees a domain error as `Err`.

pub mod instruction;
pub mod runtime;
pub mod tools;
pub mod toolset;

pub use instruction::{render_instruction, InstructionError};
pub use runtime::AgentRuntime;
pub use tools::{render_output, travel_tools, Tool, ToolContext, ToolRegistry};
pub use toolset::{resolve_toolset, HttpToolsetLoader, ToolsetError, ToolsetLoader};
