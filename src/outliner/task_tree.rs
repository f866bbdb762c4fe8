use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

use super::importance::Importance;
use super::task_node::{TaskNode, local_date_today};
use crate::error::{OutlinerError, Result};

/// Stable handle of a task inside a [`TaskTree`]
///
/// Handles are never reused within a tree, so a handle to a removed task
/// simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What [`TaskTree::find_subtask`] looks for
#[derive(Debug, Clone, Copy)]
pub enum Needle<'a> {
    /// A task equal to this one (same text and priority)
    Task(&'a TaskNode),
    /// A task with this text, ignoring leading/trailing `-` markers
    Text(&'a str),
}

impl Needle<'_> {
    fn matches(&self, node: &TaskNode, today: NaiveDate) -> bool {
        match self {
            Needle::Task(task) => node.matches(task, today),
            Needle::Text(text) => node.matches_text(text),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    node: TaskNode,
    parent: Option<TaskId>,
    children: Vec<TaskId>,
}

/// Owning tree of tasks
///
/// Every task lives in a slot of this arena. The parent owns the ordering of
/// its children; the child keeps a plain back reference to its parent. The
/// root slot is an anchor with no text and no parent: it is never returned by
/// searches or traversals.
///
/// Children are kept sorted by [`TaskNode::sibling_order`] on the tree's
/// current date. Direct edits through [`TaskTree::get_mut`] must be followed
/// by [`TaskTree::sort_children`] on the parent.
///
/// Priorities drift as the date advances, so the tree remembers the date it
/// last sorted on and re-sorts everything before the first mutation of a new
/// day (see [`TaskTree::refresh_order`]).
#[derive(Debug, Clone)]
pub struct TaskTree {
    slots: Vec<Option<Slot>>,
    exclusions: Vec<Importance>,
    pinned_today: Option<NaiveDate>,
    sorted_on: Option<NaiveDate>,
}

const ROOT: TaskId = TaskId(0);

impl Default for TaskTree {
    fn default() -> Self {
        Self {
            slots: vec![Some(Slot {
                node: TaskNode::root(),
                parent: None,
                children: Vec::new(),
            })],
            exclusions: vec![Importance::done],
            pinned_today: None,
            sorted_on: None,
        }
    }
}

impl TaskTree {
    /// Create a tree holding only the root
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> TaskId {
        ROOT
    }

    pub fn is_root(&self, id: TaskId) -> bool {
        id == ROOT
    }

    /// The date priorities are computed against
    pub fn today(&self) -> NaiveDate {
        self.pinned_today.unwrap_or_else(local_date_today)
    }

    /// Fix "today" to a given date (or release it back to the clock)
    ///
    /// Every sibling list is re-sorted, since priorities depend on the date.
    pub fn pin_today(&mut self, today: Option<NaiveDate>) {
        self.pinned_today = today;
        self.resort_all();
    }

    /// Re-sort every sibling list if "today" moved since the last full sort
    ///
    /// Returns whether a re-sort happened. Mutations call this themselves;
    /// long-lived callers may call it before reading the order.
    pub fn refresh_order(&mut self) -> bool {
        let today = self.today();
        if self.sorted_on == Some(today) {
            return false;
        }
        debug!(%today, "date changed, re-sorting task tree");
        self.resort_all();
        true
    }

    pub fn exclusions(&self) -> &[Importance] {
        &self.exclusions
    }

    /// Replace the set of importances hidden from traversals
    pub fn set_exclusions(&mut self, exclusions: Vec<Importance>) {
        self.exclusions = exclusions;
    }

    /// Number of tasks, root not counted
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.slot(id).is_ok()
    }

    fn slot(&self, id: TaskId) -> Result<&Slot> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(OutlinerError::UnknownTask(id))
    }

    fn slot_mut(&mut self, id: TaskId) -> Result<&mut Slot> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(OutlinerError::UnknownTask(id))
    }

    pub fn get(&self, id: TaskId) -> Option<&TaskNode> {
        self.slot(id).ok().map(|slot| &slot.node)
    }

    /// Mutable access for direct field edits
    ///
    /// The caller re-sorts the parent afterwards if the priority can change.
    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut TaskNode> {
        self.slot_mut(id).ok().map(|slot| &mut slot.node)
    }

    pub fn parent(&self, id: TaskId) -> Option<TaskId> {
        self.slot(id).ok().and_then(|slot| slot.parent)
    }

    /// Children of `id` in sibling order (empty for unknown handles)
    pub fn children(&self, id: TaskId) -> &[TaskId] {
        self.slot(id).map(|slot| slot.children.as_slice()).unwrap_or(&[])
    }

    /// Depth of a task: the number of ancestors, so top-level tasks are at 1
    pub fn level(&self, id: TaskId) -> usize {
        let mut level = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            level += 1;
            current = self.parent(parent);
        }
        level
    }

    pub fn priority(&self, id: TaskId) -> Option<i64> {
        let today = self.today();
        self.get(id).map(|node| node.priority(today))
    }

    pub fn is_excluded(&self, id: TaskId) -> bool {
        let today = self.today();
        self.get(id)
            .is_some_and(|node| !self.is_root(id) && node.is_excluded(&self.exclusions, today))
    }

    /// Task equality between two handles: the same task, or equal tasks
    pub fn matches(&self, a: TaskId, b: TaskId) -> bool {
        if a == b {
            return self.contains(a);
        }
        let today = self.today();
        match (self.get(a), self.get(b)) {
            (Some(x), Some(y)) => x.matches(y, today),
            _ => false,
        }
    }

    /// Attach `node` under `parent`
    ///
    /// Returns `Ok(None)` without changing anything when an equal task already
    /// exists in `parent`'s subtree. Otherwise the task is inserted before the
    /// first sibling it outranks, keeping the children sorted.
    pub fn add_subtask(&mut self, parent: TaskId, node: TaskNode) -> Result<Option<TaskId>> {
        self.slot(parent)?;
        self.refresh_order();
        if let Some(existing) = self.find_subtask(parent, Needle::Task(&node)) {
            debug!(text = %node.text, %existing, "task already present, not adding");
            return Ok(None);
        }
        self.attach(parent, node).map(Some)
    }

    /// Sorted insert under `parent` without the duplicate check
    ///
    /// Used when restoring a saved tree, where equal tasks may legitimately
    /// sit in different branches.
    pub(crate) fn attach(&mut self, parent: TaskId, node: TaskNode) -> Result<TaskId> {
        self.slot(parent)?;
        self.refresh_order();
        let today = self.today();
        let siblings = &self.slot(parent)?.children;
        let position = siblings
            .iter()
            .position(|&sibling| {
                self.get(sibling)
                    .is_some_and(|child| node.outranks(child, today))
            })
            .unwrap_or(siblings.len());

        let id = TaskId(self.slots.len());
        debug!(text = %node.text, %id, %parent, position, "adding task");
        self.slots.push(Some(Slot {
            node,
            parent: Some(parent),
            children: Vec::new(),
        }));
        self.slot_mut(parent)?.children.insert(position, id);
        Ok(id)
    }

    /// Detach `id` from its parent and drop it with its whole subtree
    ///
    /// Returns the removed task. The root cannot be removed.
    pub fn remove(&mut self, id: TaskId) -> Result<TaskNode> {
        if self.is_root(id) {
            return Err(OutlinerError::RootOperation("remove"));
        }
        let parent = self.slot(id)?.parent;
        if let Some(parent) = parent {
            self.slot_mut(parent)?.children.retain(|&child| child != id);
        }

        let mut removed = None;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(slot) = self.slots.get_mut(current.0).and_then(Option::take) {
                stack.extend(slot.children.iter().copied());
                if current == id {
                    removed = Some(slot.node);
                }
            }
        }
        debug!(%id, "removed task and its subtree");
        removed.ok_or(OutlinerError::UnknownTask(id))
    }

    /// Mark a task done or not done
    ///
    /// With `affect_children`, every descendant gets the same value first.
    /// The affected sibling lists, the parent's included, are re-sorted.
    pub fn set_done(&mut self, id: TaskId, is_done: bool, affect_children: bool) -> Result<()> {
        if self.is_root(id) {
            return Err(OutlinerError::RootOperation("complete"));
        }
        let parent = self.slot(id)?.parent;
        self.refresh_order();

        if affect_children {
            let descendants = self.descendants(id);
            for &descendant in &descendants {
                self.slot_mut(descendant)?.node.set_done_flag(is_done);
            }
            for descendant in descendants {
                self.sort_children(descendant);
            }
            self.sort_children(id);
        }
        self.slot_mut(id)?.node.set_done_flag(is_done);
        debug!(%id, is_done, affect_children, "set task completion");

        if let Some(parent) = parent {
            self.sort_children(parent);
        }
        Ok(())
    }

    /// Flip completion of a task, returning the new state
    pub fn toggle_done(&mut self, id: TaskId, affect_children: bool) -> Result<bool> {
        let is_done = !self.slot(id)?.node.is_done();
        self.set_done(id, is_done, affect_children)?;
        Ok(is_done)
    }

    /// Depth-first search of the subtree rooted at `from`
    ///
    /// `from` itself is a candidate unless it is the root.
    pub fn find_subtask(&self, from: TaskId, needle: Needle<'_>) -> Option<TaskId> {
        let today = self.today();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Ok(slot) = self.slot(id) else {
                continue;
            };
            if !self.is_root(id) && needle.matches(&slot.node, today) {
                return Some(id);
            }
            stack.extend(slot.children.iter().rev().copied());
        }
        None
    }

    /// Flattened, order-preserving traversal of the subtree at `from`
    ///
    /// Excluded tasks are skipped together with their subtrees. With
    /// `with_deadline_only`, tasks without a deadline are left out but their
    /// descendants are still visited. The root is never listed.
    pub fn get_all_children(&self, from: TaskId, with_deadline_only: bool) -> Vec<TaskId> {
        let today = self.today();
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Ok(slot) = self.slot(id) else {
                continue;
            };
            if !self.is_root(id) {
                if slot.node.is_excluded(&self.exclusions, today) {
                    continue;
                }
                if !with_deadline_only || slot.node.deadline.is_some() {
                    out.push(id);
                }
            }
            stack.extend(slot.children.iter().rev().copied());
        }
        out
    }

    /// Every task below `id`, in pre-order, excluded ones included
    pub fn descendants(&self, id: TaskId) -> Vec<TaskId> {
        let mut out = Vec::new();
        let mut stack: Vec<TaskId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Re-apply the sibling ordering to the children of `id`
    pub fn sort_children(&mut self, id: TaskId) {
        let today = self.today();
        let Ok(slot) = self.slot_mut(id) else {
            return;
        };
        let mut children = std::mem::take(&mut slot.children);
        children.sort_by(|&a, &b| match (self.get(a), self.get(b)) {
            (Some(x), Some(y)) => x.sibling_order(y, today),
            _ => Ordering::Equal,
        });
        if let Ok(slot) = self.slot_mut(id) {
            slot.children = children;
        }
    }

    /// Re-sort every sibling list, e.g. after the date changed
    pub fn resort_all(&mut self) {
        self.sorted_on = Some(self.today());
        let ids: Vec<TaskId> = (0..self.slots.len())
            .map(TaskId)
            .filter(|&id| self.contains(id))
            .collect();
        for id in ids {
            self.sort_children(id);
        }
    }

    /// Number of visible tasks in the subtree at `id`
    ///
    /// An excluded task counts zero with everything below it; the root is not
    /// counted itself.
    pub fn visible_count(&self, id: TaskId) -> usize {
        if self.is_excluded(id) || !self.contains(id) {
            return 0;
        }
        let children = self.children(id);
        if children.is_empty() {
            return if self.is_root(id) { 0 } else { 1 };
        }
        let below: usize = children.iter().map(|&child| self.visible_count(child)).sum();
        below + usize::from(!self.is_root(id))
    }

    /// Structural equality of two subtrees, possibly from different trees
    ///
    /// Nodes are compared with task equality (text and priority), each on its
    /// own tree's date, and children pairwise in order.
    pub fn is_identical(&self, id: TaskId, other: &TaskTree, other_id: TaskId) -> bool {
        let (Ok(mine), Ok(theirs)) = (self.slot(id), other.slot(other_id)) else {
            return false;
        };
        mine.node.text == theirs.node.text
            && mine.node.priority(self.today()) == theirs.node.priority(other.today())
            && mine.children.len() == theirs.children.len()
            && mine
                .children
                .iter()
                .zip(&theirs.children)
                .all(|(&a, &b)| self.is_identical(a, other, b))
    }
}
