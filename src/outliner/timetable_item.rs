use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::task_tree::{TaskId, TaskTree};
use crate::error::{OutlinerError, Result};

/// Identifier of a timetable item, unique for the lifetime of the data file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic source of [`ItemId`]s
///
/// Owned by the organizer and persisted with it; initialise it once from the
/// stored value and never hand out a value twice.
#[derive(Debug, Clone, Default)]
pub struct ItemIds {
    next: u64,
}

impl ItemIds {
    /// Resume counting at `next`
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Generate a new unique item ID
    pub fn next_id(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }

    /// The value the next call to [`ItemIds::next_id`] returns
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Make sure `id` is never handed out again
    pub fn reserve(&mut self, id: ItemId) {
        self.next = self.next.max(id.0 + 1);
    }
}

/// What a timetable item stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Free-standing event
    Event,
    /// Mirror of a task's deadline
    Task(TaskId),
}

/// An entry of a day's timetable
///
/// When only a start time is given the item is momentary: its end time is the
/// start time. Mirrors of task deadlines have no times at all.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableItem {
    id: ItemId,
    pub date: NaiveDate,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    kind: ItemKind,
}

impl TimetableItem {
    /// Create an untimed free event
    pub fn event(ids: &mut ItemIds, date: NaiveDate, name: impl Into<String>) -> Self {
        Self::restore(ids.next_id(), date, name, ItemKind::Event)
    }

    pub(crate) fn restore(
        id: ItemId,
        date: NaiveDate,
        name: impl Into<String>,
        kind: ItemKind,
    ) -> Self {
        Self {
            id,
            date,
            name: name.into(),
            location: None,
            description: None,
            start_time: None,
            end_time: None,
            kind,
        }
    }

    /// Build the mirror item of a task's deadline
    ///
    /// Fails when the task does not exist or has no deadline.
    pub fn from_task_with_deadline(
        ids: &mut ItemIds,
        tasks: &TaskTree,
        task: TaskId,
    ) -> Result<Self> {
        let node = tasks.get(task).ok_or(OutlinerError::UnknownTask(task))?;
        let deadline = node
            .deadline
            .ok_or_else(|| OutlinerError::MissingDeadline(node.text.clone()))?;
        Ok(Self::restore(
            ids.next_id(),
            deadline,
            node.text.clone(),
            ItemKind::Task(task),
        ))
    }

    /// Builder setting the time range; `end` defaults to `start`
    pub fn with_times(mut self, start: Option<NaiveTime>, end: Option<NaiveTime>) -> Self {
        self.set_times(start, end);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the time range; `end` defaults to `start`
    ///
    /// The timetable does not re-sort on its own: remove the item and add it
    /// again when it is already scheduled.
    pub fn set_times(&mut self, start: Option<NaiveTime>, end: Option<NaiveTime>) {
        self.start_time = start;
        self.end_time = start.and(end.or(start));
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }

    /// The wrapped task, for deadline mirrors
    pub fn task(&self) -> Option<TaskId> {
        match self.kind {
            ItemKind::Task(task) => Some(task),
            ItemKind::Event => None,
        }
    }

    pub fn is_task_mirror(&self) -> bool {
        self.task().is_some()
    }

    /// Timed items take part in overlap checks
    pub fn is_timed(&self) -> bool {
        !self.is_task_mirror() && self.start_time.is_some()
    }

    pub fn is_momentary(&self) -> bool {
        self.start_time == self.end_time
    }

    /// Completion of the wrapped task; free events are never done
    pub fn is_done(&self, tasks: &TaskTree) -> bool {
        self.task()
            .and_then(|task| tasks.get(task))
            .is_some_and(|node| node.is_done())
    }

    /// Item equality
    ///
    /// Two mirrors are equal when their tasks are equal (see
    /// [`TaskTree::matches`]); anything else compares every field, the
    /// identifier included.
    pub fn same_as(&self, other: &TimetableItem, tasks: &TaskTree) -> bool {
        match (self.kind, other.kind) {
            (ItemKind::Task(mine), ItemKind::Task(theirs)) => tasks.matches(mine, theirs),
            _ => self == other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outliner::{Importance, TaskNode};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = ItemIds::default();
        let a = TimetableItem::event(&mut ids, day(), "a");
        let b = TimetableItem::event(&mut ids, day(), "b");
        assert!(b.id() > a.id());
        assert_eq!(ids.peek(), 2);

        ids.reserve(ItemId(10));
        assert_eq!(ids.next_id().value(), 11);
        ids.reserve(ItemId(3));
        assert_eq!(ids.next_id().value(), 12);
    }

    #[test]
    fn test_end_time_defaults_to_start() {
        let mut ids = ItemIds::default();
        let item = TimetableItem::event(&mut ids, day(), "call").with_times(Some(at(9, 0)), None);
        assert_eq!(item.end_time(), Some(at(9, 0)));
        assert!(item.is_momentary());
        assert!(item.is_timed());

        let ranged = item.with_times(Some(at(9, 0)), Some(at(10, 0)));
        assert!(!ranged.is_momentary());

        let untimed = TimetableItem::event(&mut ids, day(), "holiday")
            .with_times(None, Some(at(10, 0)));
        assert_eq!(untimed.end_time(), None);
        assert!(!untimed.is_timed());
    }

    #[test]
    fn test_mirror_requires_deadline() {
        let mut tasks = TaskTree::new();
        let root = tasks.root();
        let plain = tasks
            .add_subtask(root, TaskNode::new("plain", None, Importance::todo_b))
            .unwrap()
            .unwrap();
        let dated = tasks
            .add_subtask(root, TaskNode::new("dated", Some(day()), Importance::todo_b))
            .unwrap()
            .unwrap();
        let mut ids = ItemIds::default();

        assert_eq!(
            TimetableItem::from_task_with_deadline(&mut ids, &tasks, plain),
            Err(OutlinerError::MissingDeadline("plain".to_string()))
        );

        let mirror = TimetableItem::from_task_with_deadline(&mut ids, &tasks, dated).unwrap();
        assert_eq!(mirror.date, day());
        assert_eq!(mirror.name, "dated");
        assert_eq!(mirror.task(), Some(dated));
        assert!(!mirror.is_timed());
        assert!(!mirror.is_done(&tasks));

        tasks.set_done(dated, true, false).unwrap();
        assert!(mirror.is_done(&tasks));
    }

    #[test]
    fn test_item_equality() {
        let mut tasks = TaskTree::new();
        let root = tasks.root();
        let dated = tasks
            .add_subtask(root, TaskNode::new("dated", Some(day()), Importance::todo_b))
            .unwrap()
            .unwrap();
        let mut ids = ItemIds::default();

        let mirror = TimetableItem::from_task_with_deadline(&mut ids, &tasks, dated).unwrap();
        let rebuilt = TimetableItem::from_task_with_deadline(&mut ids, &tasks, dated).unwrap();
        assert_ne!(mirror.id(), rebuilt.id());
        assert!(mirror.same_as(&rebuilt, &tasks));

        let event = TimetableItem::event(&mut ids, day(), "dated");
        let twin = TimetableItem::event(&mut ids, day(), "dated");
        assert!(event.same_as(&event.clone(), &tasks));
        assert!(!event.same_as(&twin, &tasks));
        assert!(!event.same_as(&mirror, &tasks));
    }
}
