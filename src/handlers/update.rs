//! Update handler for the outliner MCP server

use crate::OutlinerServerHandler;
use crate::outliner::TaskEdit;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl OutlinerServerHandler {
    /// **Edit**: Change a task's text, deadline or status.
    /// **Tip**: Use ""(empty string) as deadline to clear it.
    pub async fn handle_update_task(
        &self,
        task: String,
        text: Option<String>,
        deadline: Option<String>,
        status: Option<String>,
    ) -> McpResult<String> {
        let text = match text {
            Some(t) if t.trim().is_empty() => {
                bail_public!(_, "Task text must not be empty");
            }
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };
        let deadline = match deadline {
            Some(ref date_str) => Some(validation::parse_optional_date(date_str)?),
            None => None,
        };
        let status = match status {
            Some(ref status_str) => Some(validation::parse_status(status_str)?),
            None => None,
        };
        if text.is_none() && deadline.is_none() && status.is_none() {
            bail_public!(_, "Nothing to update: give text, deadline or status");
        }

        let mut data = self.lock_data()?;
        let Some(id) = Self::resolve_task(&data, &task) else {
            drop(data);
            bail_public!(
                _,
                "Task not found: '{}'. Use list_tasks() to see existing tasks.",
                task
            );
        };

        let edit = TaskEdit {
            text,
            deadline,
            status,
        };
        if let Err(e) = data.edit_task(id, edit) {
            drop(data);
            bail_public!(_, "Failed to update task '{}': {}", task, e);
        }

        if let Err(e) = self.storage.save(&data) {
            drop(data);
            bail_public!(_, "Failed to save: {}", e);
        }
        drop(data);

        Ok(format!("Task '{}' updated successfully", task))
    }
}
