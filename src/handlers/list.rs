//! List handlers for the outliner MCP server

use crate::OutlinerServerHandler;
use crate::formatting;
use crate::validation;
use chrono::Duration;
use mcp_attr::{Result as McpResult, bail_public};

/// Days shown by `agenda` when no length is given
const DEFAULT_AGENDA_DAYS: u32 = 7;

impl OutlinerServerHandler {
    /// Renders the task outline, optionally restricted to tasks with deadlines.
    pub async fn handle_list_tasks(&self, deadline_only: Option<bool>) -> McpResult<String> {
        let data = self.lock_data()?;
        let outline = formatting::format_outline(
            data.tasks(),
            &self.config,
            deadline_only.unwrap_or(false),
        );
        drop(data);

        if outline.is_empty() {
            return Ok("No tasks found".to_string());
        }
        Ok(outline)
    }

    /// Renders the timetable from `from` (default today) over `days` days.
    pub async fn handle_agenda(&self, from: Option<String>, days: Option<u32>) -> McpResult<String> {
        let from = match from {
            Some(ref date_str) => validation::parse_optional_date(date_str)?,
            None => None,
        };
        let days = days.unwrap_or(DEFAULT_AGENDA_DAYS).max(1);

        let data = self.lock_data()?;
        let from = from.unwrap_or_else(|| data.tasks().today());
        let Some(to) = from.checked_add_signed(Duration::days(i64::from(days) - 1)) else {
            drop(data);
            bail_public!(
                _,
                "Agenda of {} days starting {} runs past the last supported date",
                days,
                from
            );
        };
        let agenda = formatting::format_agenda(data.timetable(), data.tasks(), &self.config, from, to);
        drop(data);

        if agenda.is_empty() {
            return Ok(format!("Nothing scheduled between {} and {}", from, to));
        }
        Ok(agenda)
    }
}
