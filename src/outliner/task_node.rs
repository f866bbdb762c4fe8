use chrono::{Local, NaiveDate};
use std::cmp::Ordering;

use super::importance::Importance;

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// A single task, detached from any tree
///
/// Ownership and the parent/child relation live in [`TaskTree`](super::TaskTree);
/// a `TaskNode` only carries the task's own fields and the rules derived from
/// them (importance, priority, exclusion).
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    /// Display label
    pub text: String,
    /// Optional due date
    pub deadline: Option<NaiveDate>,
    /// Status tier; never the `done` sentinel, completion is tracked separately
    status: Importance,
    is_done: bool,
}

impl TaskNode {
    /// Create a task that is not done yet
    ///
    /// Passing [`Importance::done`] as the status creates a completed task with
    /// the default tier, since completion is not a status of its own.
    pub fn new(text: impl Into<String>, deadline: Option<NaiveDate>, status: Importance) -> Self {
        let is_done = status == Importance::done;
        Self {
            text: text.into(),
            deadline,
            status: if is_done { Importance::DEFAULT } else { status },
            is_done,
        }
    }

    pub(crate) fn root() -> Self {
        Self::new(String::new(), None, Importance::DEFAULT)
    }

    /// Builder used when restoring saved tasks
    pub fn with_done(mut self, is_done: bool) -> Self {
        self.is_done = is_done;
        self
    }

    pub fn status(&self) -> Importance {
        self.status
    }

    pub fn set_status(&mut self, status: Importance) {
        if status == Importance::done {
            self.is_done = true;
        } else {
            self.status = status;
        }
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }

    pub(crate) fn set_done_flag(&mut self, is_done: bool) {
        self.is_done = is_done;
    }

    /// The `done` sentinel for completed tasks, the status tier otherwise
    pub fn importance(&self) -> Importance {
        if self.is_done {
            Importance::done
        } else {
            self.status
        }
    }

    /// Sort key of the task on `today`; larger sorts first
    ///
    /// Completed tasks start from a fixed `1`. With a deadline, a waiting task
    /// due in the future is lifted to the default tier, then any positive
    /// priority is scaled by 1000 and reduced by the days left, so overdue
    /// tasks gain and near deadlines outrank distant ones.
    pub fn priority(&self, today: NaiveDate) -> i64 {
        let mut priority = if self.is_done {
            1
        } else {
            self.importance().value()
        };
        if let Some(deadline) = self.deadline {
            if deadline > today && priority < 0 {
                priority = Importance::DEFAULT.value();
            }
            if priority > 0 {
                priority = priority * 1000 - (deadline - today).num_days();
            }
        }
        priority
    }

    /// Whether the task is hidden from traversals
    ///
    /// A task is excluded when its importance is listed in `exclusions` and
    /// it has no deadline or its deadline has passed.
    pub fn is_excluded(&self, exclusions: &[Importance], today: NaiveDate) -> bool {
        exclusions.contains(&self.importance()) && self.deadline.is_none_or(|d| d < today)
    }

    /// Task equality: same text and same priority on `today`
    ///
    /// Priority depends on the date, so two tasks with identical fields can
    /// stop matching once the day changes if only one of them has a
    /// deadline-driven priority. Duplicate detection inherits this.
    pub fn matches(&self, other: &TaskNode, today: NaiveDate) -> bool {
        self.text == other.text && self.priority(today) == other.priority(today)
    }

    /// Whether `self` belongs before `other` among siblings
    ///
    /// Higher priority first; on equal priority the smaller text wins.
    pub fn outranks(&self, other: &TaskNode, today: NaiveDate) -> bool {
        let (mine, theirs) = (self.priority(today), other.priority(today));
        if mine == theirs {
            self.text <= other.text
        } else {
            mine > theirs
        }
    }

    /// Sibling ordering: descending priority, then ascending text
    pub fn sibling_order(&self, other: &TaskNode, today: NaiveDate) -> Ordering {
        other
            .priority(today)
            .cmp(&self.priority(today))
            .then_with(|| self.text.cmp(&other.text))
    }

    /// Compare by deadline alone
    ///
    /// `Greater` means `self` is more urgent: an earlier deadline, or any
    /// deadline against none. Two tasks without deadlines are `Equal`.
    pub fn compare_deadlines(&self, other: &TaskNode) -> Ordering {
        match (self.deadline, other.deadline) {
            (Some(mine), Some(theirs)) => theirs.cmp(&mine),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }

    /// Text search used by lookups: cosmetic `-` markers are ignored
    pub fn matches_text(&self, needle: &str) -> bool {
        self.text.trim_matches('-') == needle.trim_matches('-')
    }
}
