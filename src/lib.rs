//! Outliner MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for a personal
//! organizer: a prioritized outline of tasks and a per-day timetable of
//! events. Every task with a deadline also appears on the timetable.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `OutlinerServerHandler` - Handles MCP protocol communication
//! - **Domain Layer**: `outliner` module - Task tree, timetable and their coupling
//! - **Persistence Layer**: `storage` module - File-based TOML storage
//!
//! # Example
//!
//! ```no_run
//! use outliner_mcp::{Config, OutlinerServerHandler};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = OutlinerServerHandler::new("outline.toml", Config::default())?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod formatting;
mod handlers;
pub mod outliner;
mod storage;
pub mod validation;

use anyhow::Result;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use mcp_attr::server::{McpServer, mcp_server};
use mcp_attr::{Result as McpResult, bail_public};

// Re-export commonly used types
pub use config::Config;
pub use error::OutlinerError;
pub use outliner::{
    Importance, Needle, Organizer, TaskEdit, TaskId, TaskNode, TaskTree, Timetable,
    TimetableItem,
};
pub use storage::Storage;

/// MCP Server handler for the task outline and timetable
///
/// All changes are persisted to a TOML file after every successful tool call.
pub struct OutlinerServerHandler {
    pub(crate) data: Mutex<Organizer>,
    pub(crate) storage: Storage,
    pub(crate) config: Config,
}

impl OutlinerServerHandler {
    /// Create a new server handler
    ///
    /// # Arguments
    /// * `storage_path` - Path to the data file (TOML format)
    /// * `config` - Display and exclusion settings
    ///
    /// # Example
    /// ```no_run
    /// # use outliner_mcp::{Config, OutlinerServerHandler};
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = OutlinerServerHandler::new("outline.toml", Config::default())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(storage_path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let storage = Storage::new(storage_path);
        let mut organizer = storage.load()?;
        organizer
            .tasks_mut()
            .set_exclusions(config.tasks.exclude.clone());
        Ok(Self {
            data: Mutex::new(organizer),
            storage,
            config,
        })
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Lock the organizer, reporting a poisoned lock to the client
    ///
    /// Sibling order depends on the date, so the outline is re-sorted when a
    /// long-running server sees the day change.
    pub(crate) fn lock_data(&self) -> McpResult<MutexGuard<'_, Organizer>> {
        match self.data.lock() {
            Ok(mut data) => {
                data.tasks_mut().refresh_order();
                Ok(data)
            }
            Err(_) => {
                bail_public!(_, "Internal error: data lock poisoned by an earlier failure");
            }
        }
    }

    /// Find a task anywhere in the outline by its text
    pub(crate) fn resolve_task(data: &Organizer, text: &str) -> Option<TaskId> {
        let tasks = data.tasks();
        tasks.find_subtask(tasks.root(), Needle::Text(text.trim()))
    }
}

/// Personal organizer: a prioritized task outline plus a day-by-day timetable.
///
/// Tasks nest under other tasks and are always listed most urgent first. Each task has a
/// status tier (waiting_c/b/a, todo_c/b/a, doing_c/b/a; tier A is the most important) and an
/// optional deadline. The nearer the deadline, the higher the task sorts; overdue tasks rise
/// further. Completed tasks are hidden unless their deadline is still ahead.
///
/// Tasks are referred to by their text. Dates use YYYY-MM-DD and times HH:MM.
/// Timetable entries are numbered per day from 1, as shown by `agenda`.
/// A task with a deadline is shown on the timetable on that date.
#[mcp_server]
impl McpServer for OutlinerServerHandler {
    /// **Capture**: Add a task, at the top level or as a subtask of an existing task.
    /// **Status**: todo (default), doing, waiting, with optional tier suffix _a/_b/_c (e.g. "doing_a").
    /// **Deadline**: optional YYYY-MM-DD; the task also appears on that day in agenda().
    #[tool]
    async fn add_task(
        &self,
        /// Task text (must be unique within its parent's subtree)
        text: String,
        /// Text of the parent task (optional, top level when omitted)
        parent: Option<String>,
        /// Deadline: YYYY-MM-DD (optional)
        deadline: Option<String>,
        /// Status: todo/doing/waiting with optional _a/_b/_c tier (optional, default todo_b)
        status: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_task(text, parent, deadline, status).await
    }

    /// **Review**: Show the task outline, most urgent first, subtasks indented under their parent.
    /// **Use**: deadline_only=true lists only tasks that have a deadline.
    #[tool]
    async fn list_tasks(
        &self,
        /// Only list tasks with a deadline (optional, default false)
        deadline_only: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list_tasks(deadline_only).await
    }

    /// **Edit**: Change a task's text, deadline or status. Siblings are re-sorted afterwards.
    /// **Tip**: Use ""(empty string) as deadline to clear it. Use mark_done() for completion.
    #[tool]
    async fn update_task(
        &self,
        /// Text of the task to update
        task: String,
        /// New text (optional)
        text: Option<String>,
        /// New deadline: YYYY-MM-DD, "" to clear (optional)
        deadline: Option<String>,
        /// New status: todo/doing/waiting with optional _a/_b/_c tier (optional)
        status: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_task(task, text, deadline, status).await
    }

    /// **Complete**: Mark a task done (or not done). Without `done`, completion is toggled.
    /// **Subtasks**: follow the task unless include_subtasks=false.
    #[tool]
    async fn mark_done(
        &self,
        /// Text of the task
        task: String,
        /// true=done, false=not done (optional, toggles when omitted)
        done: Option<bool>,
        /// Apply to every subtask as well (optional, default true)
        include_subtasks: Option<bool>,
    ) -> McpResult<String> {
        self.handle_mark_done(task, done, include_subtasks).await
    }

    /// **Delete**: Permanently remove a task together with all its subtasks.
    #[tool]
    async fn remove_task(
        &self,
        /// Text of the task to remove
        task: String,
    ) -> McpResult<String> {
        self.handle_remove_task(task).await
    }

    /// **Schedule**: Add an event to a day. Timed events may not overlap each other.
    /// **Times**: start_time only = a moment; no times = all-day entry listed after timed ones.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn add_event(
        &self,
        /// Date: YYYY-MM-DD
        date: String,
        /// Event name
        name: String,
        /// Start time: HH:MM (optional)
        start_time: Option<String>,
        /// End time: HH:MM, requires start_time (optional)
        end_time: Option<String>,
        /// Location (optional)
        location: Option<String>,
        /// Description (optional)
        description: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_event(date, name, start_time, end_time, location, description)
            .await
    }

    /// **Unschedule**: Remove entry number `index` of a day, as numbered by agenda().
    /// Removing a task's deadline entry clears that task's deadline.
    #[tool]
    async fn remove_event(
        &self,
        /// Date: YYYY-MM-DD
        date: String,
        /// Entry number within the day, from 1
        index: u32,
    ) -> McpResult<String> {
        self.handle_remove_event(date, index).await
    }

    /// **Reschedule**: Move entry number `index` of a day to another date.
    /// Moving a task's deadline entry changes that task's deadline.
    #[tool]
    async fn move_event(
        &self,
        /// Current date: YYYY-MM-DD
        date: String,
        /// Entry number within the day, from 1
        index: u32,
        /// Target date: YYYY-MM-DD
        new_date: String,
    ) -> McpResult<String> {
        self.handle_move_event(date, index, new_date).await
    }

    /// **Plan**: Show the timetable day by day with numbered entries, task deadlines included.
    #[tool]
    async fn agenda(
        &self,
        /// First day: YYYY-MM-DD (optional, default today)
        from: Option<String>,
        /// Number of days (optional, default 7)
        days: Option<u32>,
    ) -> McpResult<String> {
        self.handle_agenda(from, days).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn get_test_handler() -> (OutlinerServerHandler, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let handler = OutlinerServerHandler::new(temp_file.path(), Config::default()).unwrap();
        (handler, temp_file)
    }

    #[test]
    fn test_custom_file_path() {
        let (handler, temp_file) = get_test_handler();
        assert_eq!(handler.storage().file_path(), temp_file.path());
    }

    #[test]
    fn test_config_exclusions_reach_the_tree() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.tasks.exclude = vec![Importance::done, Importance::waiting_c];
        let handler = OutlinerServerHandler::new(temp_file.path(), config).unwrap();
        let data = handler.data.lock().unwrap();
        assert_eq!(
            data.tasks().exclusions(),
            &[Importance::done, Importance::waiting_c]
        );
    }

    #[tokio::test]
    async fn test_changes_are_saved() {
        let (handler, temp_file) = get_test_handler();
        handler
            .handle_add_task("Water plants".to_string(), None, None, None)
            .await
            .unwrap();

        let reloaded = OutlinerServerHandler::new(temp_file.path(), Config::default()).unwrap();
        let listing = reloaded.handle_list_tasks(None).await.unwrap();
        assert_eq!(listing, "[ ] Water plants");
    }

    #[test]
    fn test_resolve_task_ignores_markers() {
        let (handler, _temp_file) = get_test_handler();
        let mut data = handler.data.lock().unwrap();
        let root = data.tasks().root();
        let id = data
            .add_task(root, TaskNode::new("-Inbox-", None, Importance::todo_b))
            .unwrap()
            .unwrap();
        assert_eq!(OutlinerServerHandler::resolve_task(&data, "Inbox"), Some(id));
        assert_eq!(OutlinerServerHandler::resolve_task(&data, "Outbox"), None);
    }
}
