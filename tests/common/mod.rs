//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use outliner_mcp::{Config, Organizer, OutlinerServerHandler, TaskId, TaskTree};
use tempfile::NamedTempFile;

/// Create a test handler with temporary storage
pub fn get_test_handler() -> (OutlinerServerHandler, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let handler = OutlinerServerHandler::new(temp_file.path(), Config::default()).unwrap();
    (handler, temp_file)
}

/// A date in March 2024 (the 1st is a Friday)
pub fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

/// Organizer whose "today" is pinned to 2024-03-01
pub fn pinned_organizer() -> Organizer {
    let mut organizer = Organizer::new();
    organizer.tasks_mut().pin_today(Some(march(1)));
    organizer
}

/// Texts of the given tasks, in order
pub fn texts(tasks: &TaskTree, ids: &[TaskId]) -> Vec<String> {
    ids.iter()
        .map(|&id| tasks.get(id).unwrap().text.clone())
        .collect()
}
