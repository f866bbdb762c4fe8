//! Remove-task handler for the outliner MCP server

use crate::OutlinerServerHandler;
use mcp_attr::{Result as McpResult, bail_public};

impl OutlinerServerHandler {
    /// Permanently removes a task with all its subtasks and their deadline entries.
    pub async fn handle_remove_task(&self, task: String) -> McpResult<String> {
        let mut data = self.lock_data()?;
        let Some(id) = Self::resolve_task(&data, &task) else {
            drop(data);
            bail_public!(
                _,
                "Task not found: '{}'. Use list_tasks() to see existing tasks.",
                task
            );
        };

        let subtasks = data.tasks().descendants(id).len();
        let removed = match data.remove_task(id) {
            Ok(removed) => removed,
            Err(e) => {
                drop(data);
                bail_public!(_, "Failed to remove task '{}': {}", task, e);
            }
        };

        if let Err(e) = self.storage.save(&data) {
            drop(data);
            bail_public!(_, "Failed to save: {}", e);
        }
        drop(data);

        if subtasks == 0 {
            Ok(format!("Removed task '{}'", removed.text))
        } else {
            Ok(format!(
                "Removed task '{}' and {} subtask(s)",
                removed.text, subtasks
            ))
        }
    }
}
