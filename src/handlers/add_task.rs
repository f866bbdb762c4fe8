//! Add-task handler for the outliner MCP server

use crate::OutlinerServerHandler;
use crate::outliner::{Importance, TaskNode};
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl OutlinerServerHandler {
    /// Adds a task at the top level or under an existing task found by text.
    pub async fn handle_add_task(
        &self,
        text: String,
        parent: Option<String>,
        deadline: Option<String>,
        status: Option<String>,
    ) -> McpResult<String> {
        let text = text.trim().to_string();
        if text.is_empty() {
            bail_public!(_, "Task text must not be empty");
        }
        let deadline = match deadline {
            Some(ref date_str) => validation::parse_optional_date(date_str)?,
            None => None,
        };
        let status = match status {
            Some(ref status_str) => validation::parse_status(status_str)?,
            None => Importance::DEFAULT,
        };

        let mut data = self.lock_data()?;
        let parent_id = match parent {
            Some(ref parent_text) => match Self::resolve_task(&data, parent_text) {
                Some(id) => id,
                None => {
                    drop(data);
                    bail_public!(
                        _,
                        "Parent task not found: '{}'. Use list_tasks() to see existing tasks.",
                        parent_text
                    );
                }
            },
            None => data.tasks().root(),
        };

        let node = TaskNode::new(text.clone(), deadline, status);
        match data.add_task(parent_id, node) {
            Ok(Some(_)) => {}
            Ok(None) => {
                drop(data);
                bail_public!(_, "Task '{}' already exists there", text);
            }
            Err(e) => {
                drop(data);
                bail_public!(_, "Failed to add task: {}", e);
            }
        }

        if let Err(e) = self.storage.save(&data) {
            drop(data);
            bail_public!(_, "Failed to save: {}", e);
        }
        drop(data);

        match (parent, deadline) {
            (Some(parent_text), Some(date)) => Ok(format!(
                "Task '{}' added under '{}', due {}",
                text, parent_text, date
            )),
            (Some(parent_text), None) => Ok(format!("Task '{}' added under '{}'", text, parent_text)),
            (None, Some(date)) => Ok(format!("Task '{}' added, due {}", text, date)),
            (None, None) => Ok(format!("Task '{}' added", text)),
        }
    }
}
