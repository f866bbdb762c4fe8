//! MCP tool handlers for the outliner server
//!
//! Each tool family lives in its own file. Handlers take the raw tool
//! parameters, validate them, run the operation on the organizer under the
//! data lock and save after every successful mutation.

pub mod add_task;
pub mod events;
pub mod list;
pub mod mark_done;
pub mod remove_task;
pub mod update;
