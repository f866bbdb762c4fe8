//! Error types for the outliner core.
//!
//! These are invariant violations: the caller asked for something it should
//! have ruled out first (removing the root, double-booking a time slot...).
//! Expected "not found" outcomes are never errors; they come back as `Option`.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::outliner::TaskId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutlinerError {
    /// The root task is an ownership anchor and cannot be removed or completed
    #[error("Cannot {0} the root task")]
    RootOperation(&'static str),

    #[error("Task {0} does not exist in this tree")]
    UnknownTask(TaskId),

    #[error("Task '{0}' has no deadline and cannot be placed on the timetable")]
    MissingDeadline(String),

    #[error(
        "'{name}' ({from}-{to}) overlaps '{existing}' on {date}",
        from = .start.format("%H:%M"),
        to = .end.format("%H:%M")
    )]
    TimeConflict {
        date: NaiveDate,
        name: String,
        start: NaiveTime,
        end: NaiveTime,
        existing: String,
    },

    #[error("'{name}' is not on the timetable for {date}")]
    ItemMissing { date: NaiveDate, name: String },
}

pub type Result<T> = std::result::Result<T, OutlinerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_conflict_message() {
        let err = OutlinerError::TimeConflict {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            name: "Standup".to_string(),
            start: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 45, 0).unwrap(),
            existing: "Lecture".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'Standup' (09:30-09:45) overlaps 'Lecture' on 2024-03-01"
        );
    }

    #[test]
    fn test_root_operation_message() {
        assert_eq!(
            OutlinerError::RootOperation("remove").to_string(),
            "Cannot remove the root task"
        );
    }
}
