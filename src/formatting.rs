//! Formatting helper functions for the outliner MCP server
//!
//! Text views of the task outline and of timetable days.

use crate::config::Config;
use crate::outliner::{TaskId, TaskTree, TimetableItem, Timetable};
use chrono::NaiveDate;

/// One line of the outline: indentation, icon, text and due date
pub fn format_task_line(tasks: &TaskTree, id: TaskId, config: &Config) -> Option<String> {
    let node = tasks.get(id)?;
    let indent = config
        .tasks
        .tab_string
        .repeat(tasks.level(id).saturating_sub(1));
    let mut line = format!("{}{} {}", indent, config.icons.for_task(node), node.text);
    if let Some(deadline) = node.deadline {
        line.push_str(&format!(
            " ({} {})",
            config.icons.deadline,
            deadline.format("%Y-%m-%d")
        ));
    }
    Some(line)
}

/// The visible outline, one task per line in traversal order
pub fn format_outline(tasks: &TaskTree, config: &Config, with_deadline_only: bool) -> String {
    tasks
        .get_all_children(tasks.root(), with_deadline_only)
        .into_iter()
        .filter_map(|id| format_task_line(tasks, id, config))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_times(item: &TimetableItem) -> Option<String> {
    let start = item.start_time()?;
    let end = item.end_time().unwrap_or(start);
    if item.is_momentary() {
        Some(start.format("%H:%M").to_string())
    } else {
        Some(format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")))
    }
}

/// One entry of a day listing, numbered from 1
pub fn format_item_line(
    position: usize,
    item: &TimetableItem,
    tasks: &TaskTree,
    config: &Config,
) -> String {
    if let Some(task) = item.task() {
        let icon = tasks
            .get(task)
            .map(|node| config.icons.for_task(node))
            .unwrap_or(config.icons.todo.as_str());
        return format!(
            "  {}. {} {} {}",
            position, icon, config.icons.deadline, item.name
        );
    }

    let mut line = format!("  {}. ", position);
    if let Some(times) = format_times(item) {
        line.push_str(&format!("{} ", times));
    }
    line.push_str(&format!("{} {}", config.icons.event, item.name));
    if let Some(location) = &item.location {
        line.push_str(&format!(" @ {}", location));
    }
    if let Some(description) = &item.description {
        line.push_str(&format!("\n     {}", description));
    }
    line
}

/// A day heading followed by its numbered entries
pub fn format_day(
    date: NaiveDate,
    items: &[TimetableItem],
    tasks: &TaskTree,
    config: &Config,
) -> String {
    let mut out = date.format("%Y-%m-%d (%a)").to_string();
    for (index, item) in items.iter().enumerate() {
        out.push('\n');
        out.push_str(&format_item_line(index + 1, item, tasks, config));
    }
    out
}

/// Every non-empty day in `from..=to`, separated by blank lines
pub fn format_agenda(
    timetable: &Timetable,
    tasks: &TaskTree,
    config: &Config,
    from: NaiveDate,
    to: NaiveDate,
) -> String {
    timetable
        .range(from, to)
        .map(|(date, items)| format_day(date, items, tasks, config))
        .collect::<Vec<_>>()
        .join("\n\n")
}
