//! Serialization and deserialization implementations for Organizer
//!
//! The data file nests subtasks inside their parent (`[[task]]`,
//! `[[task.subtask]]`, ...) and lists free events as `[[event]]`. Deadline
//! mirrors are not stored: they are rebuilt from the tasks on load.

use chrono::{NaiveDate, NaiveTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::importance::Importance;
use super::organizer::Organizer;
use super::task_node::TaskNode;
use super::task_tree::{TaskId, TaskTree};
use super::timetable_item::{ItemId, ItemIds, ItemKind, TimetableItem};
use crate::error::OutlinerError;

/// Current version of the data file layout
pub(crate) const FORMAT_VERSION: u32 = 1;

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedTask {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadline: Option<NaiveDate>,
    #[serde(default)]
    status: Importance,
    #[serde(default, skip_serializing_if = "is_false")]
    done: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    subtask: Vec<SavedTask>,
}

impl SavedTask {
    fn capture(tasks: &TaskTree, id: TaskId) -> Option<Self> {
        let node = tasks.get(id)?;
        Some(Self {
            text: node.text.clone(),
            deadline: node.deadline,
            status: node.status(),
            done: node.is_done(),
            subtask: tasks
                .children(id)
                .iter()
                .filter_map(|&child| Self::capture(tasks, child))
                .collect(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedEvent {
    id: ItemId,
    date: NaiveDate,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl SavedEvent {
    fn capture(item: &TimetableItem) -> Self {
        Self {
            id: item.id(),
            date: item.date,
            name: item.name.clone(),
            start_time: item.start_time(),
            end_time: item.end_time(),
            location: item.location.clone(),
            description: item.description.clone(),
        }
    }

    fn into_item(self) -> TimetableItem {
        let mut item = TimetableItem::restore(self.id, self.date, self.name, ItemKind::Event)
            .with_times(self.start_time, self.end_time);
        item.location = self.location;
        item.description = self.description;
        item
    }
}

/// Helper struct for deserialization; every field may be missing
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrganizerHelper {
    format_version: u32,
    next_item_id: u64,
    task: Vec<SavedTask>,
    event: Vec<SavedEvent>,
}

/// Rebuild a saved subtree under `parent`
///
/// Every saved task is kept, including tasks equal to one in another branch.
fn restore_subtree(
    organizer: &mut Organizer,
    parent: TaskId,
    saved: SavedTask,
) -> Result<(), OutlinerError> {
    let node = TaskNode::new(saved.text, saved.deadline, saved.status).with_done(saved.done);
    let id = organizer.restore_task(parent, node)?;
    for child in saved.subtask {
        restore_subtree(organizer, id, child)?;
    }
    Ok(())
}

impl<'de> Deserialize<'de> for Organizer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let helper = OrganizerHelper::deserialize(deserializer)?;
        if helper.format_version > FORMAT_VERSION {
            return Err(D::Error::custom(format!(
                "unsupported format_version {} (newest known is {})",
                helper.format_version, FORMAT_VERSION
            )));
        }

        let mut organizer = Organizer::new();
        organizer.ids = ItemIds::starting_at(helper.next_item_id);
        for event in &helper.event {
            organizer.ids.reserve(event.id);
        }

        let root = organizer.tasks.root();
        for saved in helper.task {
            restore_subtree(&mut organizer, root, saved).map_err(D::Error::custom)?;
        }
        for saved in helper.event {
            organizer
                .add_event(saved.into_item())
                .map_err(D::Error::custom)?;
        }
        Ok(organizer)
    }
}

impl Serialize for Organizer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Organizer", 4)?;
        state.serialize_field("format_version", &FORMAT_VERSION)?;
        state.serialize_field("next_item_id", &self.ids.peek())?;

        let tasks: Vec<SavedTask> = self
            .tasks
            .children(self.tasks.root())
            .iter()
            .filter_map(|&id| SavedTask::capture(&self.tasks, id))
            .collect();
        if !tasks.is_empty() {
            state.serialize_field("task", &tasks)?;
        }

        let events: Vec<SavedEvent> = self
            .timetable
            .items()
            .filter(|item| !item.is_task_mirror())
            .map(SavedEvent::capture)
            .collect();
        if !events.is_empty() {
            state.serialize_field("event", &events)?;
        }

        state.end()
    }
}
