//! Timetable handlers for the outliner MCP server

use crate::OutlinerServerHandler;
use crate::validation;
use chrono::NaiveTime;
use mcp_attr::{Result as McpResult, bail_public};

impl OutlinerServerHandler {
    /// Schedules a free event. Timed events may not overlap other timed events.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_add_event(
        &self,
        date: String,
        name: String,
        start_time: Option<String>,
        end_time: Option<String>,
        location: Option<String>,
        description: Option<String>,
    ) -> McpResult<String> {
        let date = validation::parse_date(&date)?;
        let name = name.trim().to_string();
        if name.is_empty() {
            bail_public!(_, "Event name must not be empty");
        }
        let start = parse_optional_time(start_time)?;
        let end = parse_optional_time(end_time)?;
        match (start, end) {
            (None, Some(_)) => {
                bail_public!(_, "end_time requires start_time");
            }
            (Some(s), Some(e)) if e < s => {
                bail_public!(
                    _,
                    "end_time {} is before start_time {}",
                    e.format("%H:%M"),
                    s.format("%H:%M")
                );
            }
            _ => {}
        }

        let mut data = self.lock_data()?;
        let mut item = data.new_event(date, name.clone()).with_times(start, end);
        item.location = location.filter(|l| !l.trim().is_empty());
        item.description = description.filter(|d| !d.trim().is_empty());
        let id = item.id();

        if let Err(e) = data.add_event(item) {
            drop(data);
            bail_public!(_, "Failed to add event: {}", e);
        }
        let position = data
            .timetable()
            .day(date)
            .iter()
            .position(|entry| entry.id() == id)
            .map_or(0, |index| index + 1);

        if let Err(e) = self.storage.save(&data) {
            drop(data);
            bail_public!(_, "Failed to save: {}", e);
        }
        drop(data);

        Ok(format!(
            "Event '{}' added on {} as entry {}",
            name, date, position
        ))
    }

    /// Removes the numbered entry of a day. Removing a deadline entry clears the task's deadline.
    pub async fn handle_remove_event(&self, date: String, index: u32) -> McpResult<String> {
        let date = validation::parse_date(&date)?;
        let position = validation::parse_index(index)?;

        let mut data = self.lock_data()?;
        let removed = match data.remove_event(date, position) {
            Ok(Some(removed)) => removed,
            Ok(None) => {
                drop(data);
                bail_public!(
                    _,
                    "No entry {} on {}. Use agenda() to see the numbered entries.",
                    index,
                    date
                );
            }
            Err(e) => {
                drop(data);
                bail_public!(_, "Failed to remove entry: {}", e);
            }
        };

        if let Err(e) = self.storage.save(&data) {
            drop(data);
            bail_public!(_, "Failed to save: {}", e);
        }
        drop(data);

        if removed.is_task_mirror() {
            Ok(format!("Cleared the deadline of task '{}'", removed.name))
        } else {
            Ok(format!("Removed event '{}' from {}", removed.name, date))
        }
    }

    /// Moves the numbered entry of a day to another date. Moving a deadline entry changes the task's deadline.
    pub async fn handle_move_event(
        &self,
        date: String,
        index: u32,
        new_date: String,
    ) -> McpResult<String> {
        let date = validation::parse_date(&date)?;
        let position = validation::parse_index(index)?;
        let new_date = validation::parse_date(&new_date)?;

        let mut data = self.lock_data()?;
        let Some(name) = data
            .timetable()
            .find_at(date, position)
            .map(|item| item.name.clone())
        else {
            drop(data);
            bail_public!(
                _,
                "No entry {} on {}. Use agenda() to see the numbered entries.",
                index,
                date
            );
        };

        match data.move_event(date, position, new_date) {
            Ok(true) => {}
            Ok(false) => {
                drop(data);
                bail_public!(_, "No entry {} on {}", index, date);
            }
            Err(e) => {
                drop(data);
                bail_public!(_, "Failed to move '{}': {}", name, e);
            }
        }

        if let Err(e) = self.storage.save(&data) {
            drop(data);
            bail_public!(_, "Failed to save: {}", e);
        }
        drop(data);

        Ok(format!("Moved '{}' from {} to {}", name, date, new_date))
    }
}

fn parse_optional_time(time: Option<String>) -> McpResult<Option<NaiveTime>> {
    match time {
        Some(ref time_str) if !time_str.trim().is_empty() => {
            validation::parse_time(time_str).map(Some)
        }
        _ => Ok(None),
    }
}
