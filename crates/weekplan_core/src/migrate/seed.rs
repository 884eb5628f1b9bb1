//! Demonstration plan written on the very first run.

use crate::calendar::WeekId;
use crate::model::plan::{DayId, WeeklyPlan};
use crate::model::task::{Priority, Task};
use crate::ordering::sort_in_place;
use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

struct DemoTask {
    day: DayId,
    title: &'static str,
    description: Option<&'static str>,
    points: u32,
    priority: Priority,
    completed: bool,
}

const DEMO_TASKS: &[DemoTask] = &[
    DemoTask {
        day: DayId::Mon,
        title: "Plan the week",
        description: Some("Drag tasks between days to rebalance"),
        points: 2,
        priority: Priority::Important,
        completed: true,
    },
    DemoTask {
        day: DayId::Mon,
        title: "30 minute walk",
        description: None,
        points: 3,
        priority: Priority::Normal,
        completed: false,
    },
    DemoTask {
        day: DayId::Tue,
        title: "Read 20 pages",
        description: None,
        points: 2,
        priority: Priority::Normal,
        completed: false,
    },
    DemoTask {
        day: DayId::Wed,
        title: "Grocery run",
        description: Some("Vegetables, oats, coffee"),
        points: 1,
        priority: Priority::Normal,
        completed: false,
    },
    DemoTask {
        day: DayId::Thu,
        title: "Workout",
        description: None,
        points: 5,
        priority: Priority::Important,
        completed: false,
    },
    DemoTask {
        day: DayId::Sat,
        title: "Call family",
        description: None,
        points: 2,
        priority: Priority::Normal,
        completed: false,
    },
];

/// Builds the first-run plan for `week_id`.
///
/// Each task is stamped one millisecond after the previous one so the
/// column order is deterministic.
pub(crate) fn demo_plan(week_id: WeekId, now: DateTime<Utc>) -> WeeklyPlan {
    let mut plan = WeeklyPlan::empty(week_id, now);
    for (offset, demo) in (0_i64..).zip(DEMO_TASKS) {
        let created_at = now
            .checked_add_signed(TimeDelta::milliseconds(offset))
            .unwrap_or(now);
        plan.day_mut(demo.day).tasks.push(Task {
            id: Uuid::new_v4().to_string(),
            title: demo.title.to_string(),
            description: demo.description.map(str::to_string),
            points: demo.points,
            completed: demo.completed,
            priority: demo.priority,
            created_at,
        });
    }
    for day in DayId::ALL {
        sort_in_place(&mut plan.day_mut(day).tasks);
    }
    plan
}
