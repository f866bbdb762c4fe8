use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::task_tree::{TaskId, TaskTree};
use super::timetable_item::TimetableItem;
use crate::error::{OutlinerError, Result};

/// Date-keyed table of ordered item lists
///
/// Within a day, timed free events never overlap on `[start, end)` and come
/// before any untimed entry already present. Untimed events and task mirrors
/// are appended and never checked for overlap. Days without items are not
/// kept in the table.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    days: BTreeMap<NaiveDate, Vec<TimetableItem>>,
}

/// Index at which `item` goes into `bucket`, or the conflict preventing it
fn placement(bucket: &[TimetableItem], item: &TimetableItem) -> Result<usize> {
    let (Some(start), Some(end)) = (item.start_time(), item.end_time()) else {
        return Ok(bucket.len());
    };
    if !item.is_timed() {
        return Ok(bucket.len());
    }
    for (index, entry) in bucket.iter().enumerate() {
        let (Some(entry_start), Some(entry_end)) = (entry.start_time(), entry.end_time()) else {
            return Ok(index);
        };
        if !entry.is_timed() {
            return Ok(index);
        }
        if entry_end <= start {
            continue;
        }
        if entry_start >= end {
            return Ok(index);
        }
        return Err(OutlinerError::TimeConflict {
            date: item.date,
            name: item.name.clone(),
            start,
            end,
            existing: entry.name.clone(),
        });
    }
    Ok(bucket.len())
}

impl Timetable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item into its date's bucket
    ///
    /// Task mirrors and untimed events go to the end. A timed event goes
    /// before the first untimed entry or the first entry starting at or after
    /// its end; overlapping an existing timed event is an error and leaves
    /// the table unchanged.
    pub fn add_item(&mut self, item: TimetableItem) -> Result<()> {
        let position = match placement(self.day(item.date), &item) {
            Ok(position) => position,
            Err(err) => {
                warn!(error = %err, "refusing overlapping timetable item");
                return Err(err);
            }
        };
        debug!(id = %item.id(), date = %item.date, name = %item.name, position, "adding timetable item");
        self.days.entry(item.date).or_default().insert(position, item);
        Ok(())
    }

    /// Remove the entry equal to `item` from `item.date`'s bucket
    ///
    /// Returns `Ok(None)` when nothing is scheduled on that date. When the
    /// date has entries but none equals `item`, the caller's bookkeeping is
    /// wrong and [`OutlinerError::ItemMissing`] is returned.
    pub fn remove_item(
        &mut self,
        item: &TimetableItem,
        tasks: &TaskTree,
    ) -> Result<Option<TimetableItem>> {
        let Some(bucket) = self.days.get(&item.date) else {
            return Ok(None);
        };
        let Some(index) = bucket.iter().position(|entry| entry.same_as(item, tasks)) else {
            return Err(OutlinerError::ItemMissing {
                date: item.date,
                name: item.name.clone(),
            });
        };
        Ok(self.remove_at(item.date, index))
    }

    /// Remove and return the `index`-th entry of `date`, if any
    pub fn remove_at(&mut self, date: NaiveDate, index: usize) -> Option<TimetableItem> {
        let bucket = self.days.get_mut(&date)?;
        if index >= bucket.len() {
            return None;
        }
        let removed = bucket.remove(index);
        if bucket.is_empty() {
            self.days.remove(&date);
        }
        debug!(id = %removed.id(), %date, index, "removed timetable item");
        Some(removed)
    }

    pub fn find_at(&self, date: NaiveDate, index: usize) -> Option<&TimetableItem> {
        self.days.get(&date)?.get(index)
    }

    /// Mutable access to an entry; changing its date or times requires a
    /// remove and re-add to keep the day ordered
    pub fn find_at_mut(&mut self, date: NaiveDate, index: usize) -> Option<&mut TimetableItem> {
        self.days.get_mut(&date)?.get_mut(index)
    }

    /// The mirror of `task`, looked up on the task's current deadline
    pub fn find_task_item(&self, task: TaskId, tasks: &TaskTree) -> Option<&TimetableItem> {
        let deadline = tasks.get(task)?.deadline?;
        self.days.get(&deadline)?.iter().find(|entry| {
            entry
                .task()
                .is_some_and(|wrapped| tasks.matches(wrapped, task))
        })
    }

    /// Position of the mirror wrapping exactly `task` on `date`
    ///
    /// Unlike [`Timetable::find_task_item`] this matches the handle, not task
    /// equality, so equal tasks in other branches are never picked up.
    pub fn mirror_index(&self, date: NaiveDate, task: TaskId) -> Option<usize> {
        self.days
            .get(&date)?
            .iter()
            .position(|entry| entry.task() == Some(task))
    }

    /// Move `item` to `new_date`
    ///
    /// Returns `Ok(false)` without touching anything when the item is not
    /// scheduled. If the item cannot be placed on the new date it is put
    /// back where it was and the conflict is returned.
    pub fn move_item(
        &mut self,
        item: &TimetableItem,
        new_date: NaiveDate,
        tasks: &TaskTree,
    ) -> Result<bool> {
        let Some(bucket) = self.days.get(&item.date) else {
            return Ok(false);
        };
        let Some(index) = bucket.iter().position(|entry| entry.same_as(item, tasks)) else {
            return Err(OutlinerError::ItemMissing {
                date: item.date,
                name: item.name.clone(),
            });
        };
        let Some(mut moved) = self.remove_at(item.date, index) else {
            return Ok(false);
        };

        let old_date = moved.date;
        moved.date = new_date;
        match placement(self.day(new_date), &moved) {
            Ok(position) => {
                debug!(id = %moved.id(), from = %old_date, to = %new_date, "moved timetable item");
                self.days.entry(new_date).or_default().insert(position, moved);
                Ok(true)
            }
            Err(err) => {
                warn!(error = %err, "move refused, restoring item");
                moved.date = old_date;
                self.days.entry(old_date).or_default().insert(index, moved);
                Err(err)
            }
        }
    }

    /// Entries of one day, in order
    pub fn day(&self, date: NaiveDate) -> &[TimetableItem] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every non-empty day in date order
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &[TimetableItem])> {
        self.days.iter().map(|(date, items)| (*date, items.as_slice()))
    }

    /// Non-empty days within `from..=to`
    pub fn range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = (NaiveDate, &[TimetableItem])> {
        self.days
            .range(from..=to)
            .map(|(date, items)| (*date, items.as_slice()))
    }

    pub fn items(&self) -> impl Iterator<Item = &TimetableItem> {
        self.days.values().flatten()
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
