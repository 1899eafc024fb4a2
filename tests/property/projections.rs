//! Property tests for the view projector: partition, count consistency,
//! and display-sort ordering over arbitrary task lists.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use taskdeck::store::views::{count_summary, select_active, select_completed, sort_for_display};
use taskdeck_proto::task::{Priority, Task, TaskId};

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
    ]
}

fn task_strategy() -> impl Strategy<Value = Task> {
    (
        "[a-zA-Z ]{1,24}",
        priority_strategy(),
        any::<bool>(),
        0i64..1_000_000i64,
    )
        .prop_map(|(text, priority, completed, offset)| {
            let created_at = Utc.timestamp_opt(1_700_000_000 + offset, 0).unwrap();
            Task {
                id: TaskId::new(),
                text,
                priority,
                completed,
                created_at,
                completed_at: completed.then(|| created_at + Duration::seconds(60)),
                owner_id: "owner".to_string(),
            }
        })
}

fn task_list_strategy() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(task_strategy(), 0..40)
}

proptest! {
    #[test]
    fn active_and_completed_partition_the_list(tasks in task_list_strategy()) {
        let active = select_active(&tasks);
        let completed = select_completed(&tasks);

        prop_assert_eq!(active.len() + completed.len(), tasks.len());
        // Every task lands in exactly one of the two selections.
        for task in &tasks {
            let in_active = active.iter().any(|t| t.id == task.id);
            let in_completed = completed.iter().any(|t| t.id == task.id);
            prop_assert!(in_active ^ in_completed);
        }
    }

    #[test]
    fn count_summary_is_always_consistent(tasks in task_list_strategy()) {
        let summary = count_summary(&tasks);
        prop_assert_eq!(summary.active + summary.completed, summary.total);
        prop_assert_eq!(summary.total, tasks.len());
        prop_assert_eq!(summary.active, select_active(&tasks).len());
        prop_assert_eq!(summary.completed, select_completed(&tasks).len());
    }

    #[test]
    fn display_sort_is_ordered(tasks in task_list_strategy()) {
        let sorted = sort_for_display(tasks.iter().collect());
        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let ordered = a.priority > b.priority
                || (a.priority == b.priority && a.created_at >= b.created_at);
            prop_assert!(ordered, "out of order: {:?} before {:?}", a.text, b.text);
        }
    }

    #[test]
    fn display_sort_is_a_permutation(tasks in task_list_strategy()) {
        let sorted = sort_for_display(tasks.iter().collect());
        prop_assert_eq!(sorted.len(), tasks.len());
        for task in &tasks {
            prop_assert!(sorted.iter().any(|t| t.id == task.id));
        }
    }

    #[test]
    fn display_sort_never_mutates_the_source(tasks in task_list_strategy()) {
        let before = tasks.clone();
        let _ = sort_for_display(tasks.iter().collect());
        prop_assert_eq!(tasks, before);
    }

    #[test]
    fn completion_invariant_holds_for_generated_tasks(tasks in task_list_strategy()) {
        // Sanity check on the generator itself: it only produces tasks
        // satisfying the pairing invariant the projector assumes.
        for task in &tasks {
            prop_assert_eq!(task.completed, task.completed_at.is_some());
        }
    }
}
