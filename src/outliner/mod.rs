//! Task outline and timetable domain
//!
//! - `importance`: the status-priority scale
//! - `task_node` / `task_tree`: tasks and the tree that owns them
//! - `timetable_item` / `timetable`: dated entries and the per-day table
//! - `organizer`: both structures kept in step (deadline mirrors)
//! - `serde_impl`: the data file format

mod importance;
mod organizer;
mod serde_impl;
mod task_node;
mod task_tree;
mod timetable;
mod timetable_item;

pub use importance::{Category, Importance};
pub use organizer::{Organizer, TaskEdit};
pub use task_node::{TaskNode, local_date_today};
pub use task_tree::{Needle, TaskId, TaskTree};
pub use timetable::Timetable;
pub use timetable_item::{ItemId, ItemIds, ItemKind, TimetableItem};
