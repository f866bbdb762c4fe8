//! Completion handler for the outliner MCP server

use crate::OutlinerServerHandler;
use mcp_attr::{Result as McpResult, bail_public};

impl OutlinerServerHandler {
    /// Sets or toggles completion of a task, by default together with its subtasks.
    pub async fn handle_mark_done(
        &self,
        task: String,
        done: Option<bool>,
        include_subtasks: Option<bool>,
    ) -> McpResult<String> {
        let mut data = self.lock_data()?;
        let Some(id) = Self::resolve_task(&data, &task) else {
            drop(data);
            bail_public!(
                _,
                "Task not found: '{}'. Use list_tasks() to see existing tasks.",
                task
            );
        };

        let is_done = match data.mark_done(id, done, include_subtasks.unwrap_or(true)) {
            Ok(is_done) => is_done,
            Err(e) => {
                drop(data);
                bail_public!(_, "Failed to update task '{}': {}", task, e);
            }
        };

        if let Err(e) = self.storage.save(&data) {
            drop(data);
            bail_public!(_, "Failed to save: {}", e);
        }
        drop(data);

        if is_done {
            Ok(format!("Task '{}' marked as done", task))
        } else {
            Ok(format!("Task '{}' marked as not done", task))
        }
    }
}
