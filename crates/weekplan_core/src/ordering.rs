//! Task ordering policy applied to every day column.
//!
//! # Invariants
//! - `important` tasks precede all `normal` tasks.
//! - Within one priority tier, tasks ascend by `created_at`.
//! - The sort is stable and idempotent; ties keep their current relative order.

use crate::model::task::{Priority, Task};
use std::cmp::Ordering;

/// Sorts a task list into column order and returns it.
pub fn sort_tasks(mut tasks: Vec<Task>) -> Vec<Task> {
    sort_in_place(&mut tasks);
    tasks
}

/// Sorts a task slice into column order without reallocating.
pub fn sort_in_place(tasks: &mut [Task]) {
    // `sort_by` is stable.
    tasks.sort_by(compare_tasks);
}

/// Returns whether `tasks` already satisfies the column order.
pub fn is_sorted(tasks: &[Task]) -> bool {
    tasks
        .windows(2)
        .all(|pair| compare_tasks(&pair[0], &pair[1]) != Ordering::Greater)
}

fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    priority_rank(a.priority)
        .cmp(&priority_rank(b.priority))
        .then_with(|| a.created_at.cmp(&b.created_at))
}

fn priority_rank(priority: Priority) -> u8 {
    match priority {
        Priority::Important => 0,
        Priority::Normal => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_sorted, sort_tasks};
    use crate::model::task::{Priority, Task};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 8, minute, 0).unwrap()
    }

    fn task(id: &str, priority: Priority, minute: u32) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            points: 1,
            completed: false,
            priority,
            created_at: at(minute),
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn important_tasks_come_first_then_creation_time() {
        let sorted = sort_tasks(vec![
            task("n2", Priority::Normal, 20),
            task("i2", Priority::Important, 30),
            task("n1", Priority::Normal, 10),
            task("i1", Priority::Important, 5),
        ]);

        assert_eq!(ids(&sorted), vec!["i1", "i2", "n1", "n2"]);
        assert!(is_sorted(&sorted));
    }

    #[test]
    fn sorting_is_idempotent() {
        let once = sort_tasks(vec![
            task("c", Priority::Normal, 3),
            task("a", Priority::Important, 9),
            task("b", Priority::Normal, 1),
        ]);
        let twice = sort_tasks(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn equal_keys_keep_relative_order() {
        let sorted = sort_tasks(vec![
            task("first", Priority::Normal, 1),
            task("second", Priority::Normal, 1),
            task("third", Priority::Normal, 1),
        ]);
        assert_eq!(ids(&sorted), vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_list_is_sorted() {
        assert!(sort_tasks(Vec::new()).is_empty());
        assert!(is_sorted(&[]));
    }
}
