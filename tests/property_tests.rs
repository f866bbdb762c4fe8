//! Property tests for the ordering and non-overlap invariants
mod common;

use chrono::{Duration, NaiveTime};
use common::{march, pinned_organizer};
use outliner_mcp::{Importance, Organizer, TaskNode};
use proptest::prelude::*;

fn importance() -> impl Strategy<Value = Importance> {
    prop::sample::select(Importance::ALL.to_vec())
}

fn task() -> impl Strategy<Value = (String, Option<i64>, Importance, bool)> {
    (
        "[a-e]{1,3}",
        prop::option::of(-5i64..20),
        importance(),
        any::<bool>(),
    )
}

proptest! {
    #[test]
    fn siblings_stay_sorted(tasks in prop::collection::vec(task(), 1..25)) {
        let mut org = pinned_organizer();
        let today = org.tasks().today();
        let root = org.tasks().root();
        for (text, offset, status, done) in tasks {
            let deadline = offset.map(|days| today + Duration::days(days));
            let node = TaskNode::new(text, deadline, status).with_done(done);
            org.add_task(root, node).unwrap();
        }

        let children = org.tasks().children(root);
        for pair in children.windows(2) {
            let (a, b) = (org.tasks().get(pair[0]).unwrap(), org.tasks().get(pair[1]).unwrap());
            let (pa, pb) = (a.priority(today), b.priority(today));
            prop_assert!(pa > pb || (pa == pb && a.text <= b.text));
        }
        // Every task with a deadline has exactly one mirror.
        let with_deadline = children
            .iter()
            .filter(|&&id| org.tasks().get(id).unwrap().deadline.is_some())
            .count();
        prop_assert_eq!(org.timetable().len(), with_deadline);
    }

    #[test]
    fn nested_outline_stays_sorted_and_survives_a_save(
        tasks in prop::collection::vec((task(), any::<prop::sample::Index>()), 1..25),
    ) {
        let mut org = pinned_organizer();
        let today = org.tasks().today();
        let mut parents = vec![org.tasks().root()];
        for ((text, offset, status, done), parent) in tasks {
            let deadline = offset.map(|days| today + Duration::days(days));
            let node = TaskNode::new(text, deadline, status).with_done(done);
            let parent = *parent.get(&parents);
            if let Some(id) = org.add_task(parent, node).unwrap() {
                parents.push(id);
            }
        }

        let tasks = org.tasks();
        for &parent in &parents {
            for pair in tasks.children(parent).windows(2) {
                let (a, b) = (tasks.get(pair[0]).unwrap(), tasks.get(pair[1]).unwrap());
                let (pa, pb) = (a.priority(today), b.priority(today));
                prop_assert!(pa > pb || (pa == pb && a.text <= b.text));
            }
        }
        let with_deadline = tasks
            .descendants(tasks.root())
            .into_iter()
            .filter(|&id| tasks.get(id).unwrap().deadline.is_some())
            .count();
        prop_assert_eq!(org.timetable().len(), with_deadline);

        let text = toml::to_string(&org).unwrap();
        let mut loaded: Organizer = toml::from_str(&text).unwrap();
        loaded.tasks_mut().pin_today(Some(today));
        prop_assert_eq!(loaded.tasks().len(), org.tasks().len());
        prop_assert!(loaded.tasks().is_identical(loaded.tasks().root(), org.tasks(), org.tasks().root()));
        prop_assert_eq!(loaded.timetable().len(), with_deadline);
    }

    #[test]
    fn timed_events_never_overlap(slots in prop::collection::vec((0u32..24, 0u32..4, 0u32..3), 1..30)) {
        let mut org = Organizer::new();
        for (hour, quarter, length) in slots {
            let start = NaiveTime::from_hms_opt(hour, quarter * 15, 0).unwrap();
            let end = start + Duration::minutes(i64::from(length) * 30);
            let end = if end < start { start } else { end };
            let item = org.new_event(march(1), "slot").with_times(Some(start), Some(end));
            let before = org.timetable().len();
            match org.add_event(item) {
                Ok(()) => prop_assert_eq!(org.timetable().len(), before + 1),
                Err(_) => prop_assert_eq!(org.timetable().len(), before),
            }
        }

        let day = org.timetable().day(march(1));
        for pair in day.windows(2) {
            prop_assert!(pair[0].end_time().unwrap() <= pair[1].start_time().unwrap());
        }
    }

    #[test]
    fn adding_then_removing_an_event_restores_the_day(
        hour in 0u32..23,
        existing in prop::collection::vec(0u32..23, 0..6),
    ) {
        let mut org = Organizer::new();
        for h in existing {
            let start = NaiveTime::from_hms_opt(h, 0, 0);
            let item = org.new_event(march(1), "busy").with_times(start, NaiveTime::from_hms_opt(h + 1, 0, 0));
            let _ = org.add_event(item);
        }
        let before = org.timetable().day(march(1)).to_vec();

        let item = org
            .new_event(march(1), "extra")
            .with_times(NaiveTime::from_hms_opt(hour, 0, 0), NaiveTime::from_hms_opt(hour + 1, 0, 0));
        if org.add_event(item.clone()).is_ok() {
            let index = org
                .timetable()
                .day(march(1))
                .iter()
                .position(|entry| entry.id() == item.id())
                .unwrap();
            let removed = org.remove_event(march(1), index).unwrap();
            prop_assert_eq!(removed, Some(item));
        }
        prop_assert_eq!(org.timetable().day(march(1)), before.as_slice());
    }
}
