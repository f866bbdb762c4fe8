use chrono::NaiveDate;
use tracing::debug;

use super::importance::Importance;
use super::task_node::TaskNode;
use super::task_tree::{TaskId, TaskTree};
use super::timetable::Timetable;
use super::timetable_item::{ItemIds, TimetableItem};
use crate::error::{OutlinerError, Result};

/// Changes to apply to a task in one go
///
/// `deadline: Some(None)` clears the deadline.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub text: Option<String>,
    pub deadline: Option<Option<NaiveDate>>,
    pub status: Option<Importance>,
}

/// Task tree and timetable kept consistent with each other
///
/// The two structures do not follow each other on their own: every task with
/// a deadline should have exactly one mirror item on that date. The organizer
/// is the caller that upholds this, adding, moving and removing mirrors
/// whenever a task's deadline comes or goes.
#[derive(Debug, Clone, Default)]
pub struct Organizer {
    pub(crate) tasks: TaskTree,
    pub(crate) timetable: Timetable,
    pub(crate) ids: ItemIds,
}

impl Organizer {
    /// Create an empty organizer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &TaskTree {
        &self.tasks
    }

    /// Direct access to the tree for settings (date pinning, exclusions)
    ///
    /// Structural edits made through it bypass mirror bookkeeping.
    pub fn tasks_mut(&mut self) -> &mut TaskTree {
        &mut self.tasks
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// Build a free event with a fresh identifier
    pub fn new_event(&mut self, date: NaiveDate, name: impl Into<String>) -> TimetableItem {
        TimetableItem::event(&mut self.ids, date, name)
    }

    /// Add a task under `parent`, mirroring its deadline on the timetable
    ///
    /// Returns `Ok(None)` if an equal task already exists under `parent`.
    pub fn add_task(&mut self, parent: TaskId, node: TaskNode) -> Result<Option<TaskId>> {
        let Some(id) = self.tasks.add_subtask(parent, node)? else {
            return Ok(None);
        };
        self.attach_mirror(id)?;
        Ok(Some(id))
    }

    /// Apply `edit` to a task, re-sorting its siblings and updating its mirror
    pub fn edit_task(&mut self, id: TaskId, edit: TaskEdit) -> Result<()> {
        if self.tasks.is_root(id) {
            return Err(OutlinerError::RootOperation("edit"));
        }
        if !self.tasks.contains(id) {
            return Err(OutlinerError::UnknownTask(id));
        }

        if edit.deadline.is_some() {
            self.detach_mirror(id)?;
        }
        let renamed = edit.text.is_some();
        if let Some(node) = self.tasks.get_mut(id) {
            if let Some(text) = edit.text {
                node.text = text;
            }
            if let Some(deadline) = edit.deadline {
                node.deadline = deadline;
            }
            if let Some(status) = edit.status {
                node.set_status(status);
            }
        }
        if let Some(parent) = self.tasks.parent(id) {
            self.tasks.sort_children(parent);
        }

        if edit.deadline.is_some() {
            self.attach_mirror(id)?;
        } else if renamed {
            if let Some(node) = self.tasks.get(id)
                && let Some(deadline) = node.deadline
                && let Some(index) = self.timetable.mirror_index(deadline, id)
                && let Some(mirror) = self.timetable.find_at_mut(deadline, index)
            {
                mirror.name = node.text.clone();
            }
        }
        debug!(%id, "edited task");
        Ok(())
    }

    /// Set completion (`Some`) or toggle it (`None`), returning the new state
    pub fn mark_done(
        &mut self,
        id: TaskId,
        is_done: Option<bool>,
        affect_children: bool,
    ) -> Result<bool> {
        match is_done {
            Some(is_done) => {
                self.tasks.set_done(id, is_done, affect_children)?;
                Ok(is_done)
            }
            None => self.tasks.toggle_done(id, affect_children),
        }
    }

    /// Remove a task with its subtree and every mirror belonging to them
    pub fn remove_task(&mut self, id: TaskId) -> Result<TaskNode> {
        if self.tasks.is_root(id) {
            return Err(OutlinerError::RootOperation("remove"));
        }
        if !self.tasks.contains(id) {
            return Err(OutlinerError::UnknownTask(id));
        }
        let mut affected = vec![id];
        affected.extend(self.tasks.descendants(id));
        for task in affected {
            self.detach_mirror(task)?;
        }
        self.tasks.remove(id)
    }

    /// Attach a saved task under `parent` without the duplicate check
    pub(crate) fn restore_task(&mut self, parent: TaskId, node: TaskNode) -> Result<TaskId> {
        let id = self.tasks.attach(parent, node)?;
        self.attach_mirror(id)?;
        Ok(id)
    }

    /// Schedule a free event
    pub fn add_event(&mut self, item: TimetableItem) -> Result<()> {
        self.timetable.add_item(item)
    }

    /// Remove the `index`-th entry of `date`
    ///
    /// Removing a task mirror clears that task's deadline, so the task does
    /// not keep pointing at a date it is no longer listed on.
    pub fn remove_event(&mut self, date: NaiveDate, index: usize) -> Result<Option<TimetableItem>> {
        let Some(item) = self.timetable.find_at(date, index).cloned() else {
            return Ok(None);
        };
        if let Some(task) = item.task() {
            self.edit_task(
                task,
                TaskEdit {
                    deadline: Some(None),
                    ..Default::default()
                },
            )?;
            return Ok(Some(item));
        }
        Ok(self.timetable.remove_at(date, index))
    }

    /// Move the `index`-th entry of `date` to `new_date`
    ///
    /// Moving a task mirror changes the task's deadline. Returns `Ok(false)`
    /// when there is no such entry.
    pub fn move_event(&mut self, date: NaiveDate, index: usize, new_date: NaiveDate) -> Result<bool> {
        let Some(item) = self.timetable.find_at(date, index).cloned() else {
            return Ok(false);
        };
        if let Some(task) = item.task() {
            self.edit_task(
                task,
                TaskEdit {
                    deadline: Some(Some(new_date)),
                    ..Default::default()
                },
            )?;
            return Ok(true);
        }
        self.timetable.move_item(&item, new_date, &self.tasks)
    }

    fn attach_mirror(&mut self, id: TaskId) -> Result<()> {
        if self.tasks.get(id).is_some_and(|node| node.deadline.is_some()) {
            let mirror = TimetableItem::from_task_with_deadline(&mut self.ids, &self.tasks, id)?;
            self.timetable.add_item(mirror)?;
        }
        Ok(())
    }

    /// Remove the mirror of exactly this task, found on its current deadline
    fn detach_mirror(&mut self, id: TaskId) -> Result<()> {
        let Some(deadline) = self.tasks.get(id).and_then(|node| node.deadline) else {
            return Ok(());
        };
        if let Some(index) = self.timetable.mirror_index(deadline, id) {
            self.timetable.remove_at(deadline, index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn organizer() -> Organizer {
        let mut organizer = Organizer::new();
        organizer.tasks_mut().pin_today(Some(day(1)));
        organizer
    }

    #[test]
    fn test_add_task_mirrors_deadline() {
        let mut org = organizer();
        let root = org.tasks().root();
        let plain = org
            .add_task(root, TaskNode::new("plain", None, Importance::todo_b))
            .unwrap()
            .unwrap();
        let dated = org
            .add_task(root, TaskNode::new("dated", Some(day(4)), Importance::todo_b))
            .unwrap()
            .unwrap();

        assert!(org.timetable().find_task_item(plain, org.tasks()).is_none());
        let mirror = org.timetable().find_task_item(dated, org.tasks()).unwrap();
        assert_eq!(mirror.date, day(4));
        assert_eq!(org.timetable().len(), 1);

        // Duplicates add neither a task nor a mirror.
        let again = org
            .add_task(root, TaskNode::new("dated", Some(day(4)), Importance::todo_b))
            .unwrap();
        assert_eq!(again, None);
        assert_eq!(org.timetable().len(), 1);
    }

    #[test]
    fn test_edit_deadline_moves_mirror() {
        let mut org = organizer();
        let root = org.tasks().root();
        let task = org
            .add_task(root, TaskNode::new("essay", Some(day(4)), Importance::todo_b))
            .unwrap()
            .unwrap();

        org.edit_task(
            task,
            TaskEdit {
                deadline: Some(Some(day(8))),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(org.timetable().day(day(4)).is_empty());
        assert_eq!(org.timetable().day(day(8)).len(), 1);
        assert_eq!(org.timetable().find_task_item(task, org.tasks()).unwrap().date, day(8));

        org.edit_task(
            task,
            TaskEdit {
                deadline: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(org.timetable().is_empty());
    }

    #[test]
    fn test_edit_text_renames_mirror_and_resorts() {
        let mut org = organizer();
        let root = org.tasks().root();
        let a = org
            .add_task(root, TaskNode::new("alpha", Some(day(3)), Importance::todo_b))
            .unwrap()
            .unwrap();
        let b = org
            .add_task(root, TaskNode::new("beta", None, Importance::todo_b))
            .unwrap()
            .unwrap();
        assert_eq!(org.tasks().children(root), &[a, b]);

        org.edit_task(
            a,
            TaskEdit {
                text: Some("omega".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(org.timetable().day(day(3))[0].name, "omega");

        org.edit_task(
            b,
            TaskEdit {
                status: Some(Importance::doing_a),
                deadline: Some(Some(day(2))),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(org.tasks().children(root), &[b, a]);
    }

    #[test]
    fn test_remove_task_removes_subtree_mirrors() {
        let mut org = organizer();
        let root = org.tasks().root();
        let top = org
            .add_task(root, TaskNode::new("move house", Some(day(20)), Importance::doing_b))
            .unwrap()
            .unwrap();
        org.add_task(top, TaskNode::new("book van", Some(day(10)), Importance::todo_b))
            .unwrap();
        let event = org.new_event(day(10), "viewing").with_times(
            NaiveTime::from_hms_opt(9, 0, 0),
            NaiveTime::from_hms_opt(10, 0, 0),
        );
        org.add_event(event).unwrap();
        assert_eq!(org.timetable().len(), 3);

        let removed = org.remove_task(top).unwrap();
        assert_eq!(removed.text, "move house");
        assert_eq!(org.timetable().len(), 1);
        assert_eq!(org.timetable().day(day(10))[0].name, "viewing");
        assert!(org.tasks().is_empty());

        assert_eq!(
            org.remove_task(root),
            Err(OutlinerError::RootOperation("remove"))
        );
    }

    #[test]
    fn test_equal_tasks_keep_their_own_mirrors() {
        let mut org = organizer();
        let root = org.tasks().root();
        let a = org
            .add_task(root, TaskNode::new("A", None, Importance::doing_a))
            .unwrap()
            .unwrap();
        let b = org
            .add_task(root, TaskNode::new("B", None, Importance::doing_b))
            .unwrap()
            .unwrap();
        let pay_a = org
            .add_task(a, TaskNode::new("Pay", Some(day(5)), Importance::todo_b))
            .unwrap()
            .unwrap();
        let pay_b = org
            .add_task(b, TaskNode::new("Pay", Some(day(5)), Importance::todo_b))
            .unwrap()
            .unwrap();
        assert!(org.tasks().matches(pay_a, pay_b));

        org.edit_task(
            pay_b,
            TaskEdit {
                deadline: Some(Some(day(9))),
                ..Default::default()
            },
        )
        .unwrap();
        let on_fifth: Vec<_> = org.timetable().day(day(5)).iter().map(|i| i.task()).collect();
        assert_eq!(on_fifth, vec![Some(pay_a)]);
        let on_ninth: Vec<_> = org.timetable().day(day(9)).iter().map(|i| i.task()).collect();
        assert_eq!(on_ninth, vec![Some(pay_b)]);

        // Renaming one of two equal tasks renames only its own mirror.
        org.edit_task(
            pay_b,
            TaskEdit {
                deadline: Some(Some(day(5))),
                ..Default::default()
            },
        )
        .unwrap();
        org.edit_task(
            pay_b,
            TaskEdit {
                text: Some("Pay back".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let names: Vec<_> = org
            .timetable()
            .day(day(5))
            .iter()
            .map(|i| (i.task(), i.name.as_str()))
            .collect();
        assert_eq!(names, vec![(Some(pay_a), "Pay"), (Some(pay_b), "Pay back")]);

        org.remove_task(b).unwrap();
        let on_fifth: Vec<_> = org.timetable().day(day(5)).iter().map(|i| i.task()).collect();
        assert_eq!(on_fifth, vec![Some(pay_a)]);
    }

    #[test]
    fn test_mark_done_sets_and_toggles() {
        let mut org = organizer();
        let root = org.tasks().root();
        let task = org
            .add_task(root, TaskNode::new("task", Some(day(5)), Importance::todo_b))
            .unwrap()
            .unwrap();
        assert_eq!(org.mark_done(task, None, true), Ok(true));
        assert!(org.timetable().day(day(5))[0].is_done(org.tasks()));
        assert_eq!(org.mark_done(task, Some(true), true), Ok(true));
        assert_eq!(org.mark_done(task, None, true), Ok(false));
    }

    #[test]
    fn test_move_and_remove_events() {
        let mut org = organizer();
        let root = org.tasks().root();
        let task = org
            .add_task(root, TaskNode::new("renew passport", Some(day(5)), Importance::todo_b))
            .unwrap()
            .unwrap();
        let party = org.new_event(day(5), "party");
        org.add_event(party).unwrap();
        assert_eq!(org.timetable().day(day(5)).len(), 2);

        // Index 0 is the mirror: moving it moves the deadline.
        assert_eq!(org.move_event(day(5), 0, day(6)), Ok(true));
        assert_eq!(org.tasks().get(task).unwrap().deadline, Some(day(6)));
        assert_eq!(org.timetable().day(day(6)).len(), 1);

        assert_eq!(org.move_event(day(5), 0, day(7)), Ok(true));
        assert_eq!(org.timetable().day(day(7))[0].name, "party");
        assert_eq!(org.move_event(day(5), 0, day(7)), Ok(false));

        // Removing the mirror clears the deadline.
        let removed = org.remove_event(day(6), 0).unwrap().unwrap();
        assert_eq!(removed.task(), Some(task));
        assert_eq!(org.tasks().get(task).unwrap().deadline, None);
        assert_eq!(org.remove_event(day(6), 0), Ok(None));

        let removed = org.remove_event(day(7), 0).unwrap().unwrap();
        assert_eq!(removed.name, "party");
        assert!(org.timetable().is_empty());
    }
}
