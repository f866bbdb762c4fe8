//! Validation helper functions for the outliner MCP server
//!
//! Tool parameters arrive as strings and 1-based numbers; these helpers turn
//! them into core types or a public `INVALID_PARAMS` error.

use crate::outliner::Importance;
use chrono::{NaiveDate, NaiveTime};
use mcp_attr::Result as McpResult;

fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}

/// Parse a date in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> McpResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        invalid_params(format!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
            date_str
        ))
    })
}

/// Parse a date where an empty string means "no date"
pub fn parse_optional_date(date_str: &str) -> McpResult<Option<NaiveDate>> {
    if date_str.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(date_str).map(Some)
    }
}

/// Parse a time of day in HH:MM format
pub fn parse_time(time_str: &str) -> McpResult<NaiveTime> {
    NaiveTime::parse_from_str(time_str.trim(), "%H:%M").map_err(|_| {
        invalid_params(format!(
            "Invalid time format '{}'. Use HH:MM (e.g., '09:30')",
            time_str
        ))
    })
}

/// Parse a task status
///
/// `done` is refused: completion is set with `mark_done`.
pub fn parse_status(status_str: &str) -> McpResult<Importance> {
    match status_str.parse::<Importance>() {
        Ok(Importance::done) => Err(invalid_params(
            "Status 'done' cannot be set directly. Use mark_done() instead.".to_string(),
        )),
        Ok(status) => Ok(status),
        Err(message) => Err(invalid_params(message)),
    }
}

/// Convert a 1-based position shown to clients into a 0-based index
pub fn parse_index(position: u32) -> McpResult<usize> {
    match position.checked_sub(1) {
        Some(index) => Ok(index as usize),
        None => Err(invalid_params(
            "Invalid index 0. Entries are numbered from 1, as shown by agenda().".to_string(),
        )),
    }
}
