use chrono::{TimeZone, Utc};
use weekplan_core::stats::{
    completed_points_for_day, daily_goal_progress, day_task_counts, progress_percent,
    task_counts, total_completed_points, weekly_goal_progress,
};
use weekplan_core::{AppSettings, DayId, NewTask, Task, TaskCounts, WeekId, WeeklyPlan};

fn plan_with(tasks: &[(DayId, u32, bool)]) -> WeeklyPlan {
    let created_at = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
    let mut plan = WeeklyPlan::empty(WeekId::parse("2024-W10").unwrap(), created_at);
    for (index, (day, points, completed)) in tasks.iter().enumerate() {
        let mut task = Task::from_input(
            NewTask::new(format!("task {index}")).with_points(f64::from(*points)),
            created_at,
        );
        task.completed = *completed;
        plan.day_mut(*day).tasks.push(task);
    }
    plan
}

#[test]
fn empty_plan_projects_zeroes() {
    let plan = plan_with(&[]);

    assert_eq!(
        task_counts(&plan),
        TaskCounts {
            completed: 0,
            total: 0,
            percent: 0,
        }
    );
    assert_eq!(total_completed_points(&plan), 0);
    assert_eq!(weekly_goal_progress(&plan, &AppSettings::default()), 0);
}

#[test]
fn counts_round_the_completion_percentage() {
    let plan = plan_with(&[
        (DayId::Mon, 1, true),
        (DayId::Mon, 1, false),
        (DayId::Fri, 1, false),
    ]);

    let counts = task_counts(&plan);
    assert_eq!(counts.completed, 1);
    assert_eq!(counts.total, 3);
    assert_eq!(counts.percent, 33);

    let two_thirds = plan_with(&[
        (DayId::Tue, 1, true),
        (DayId::Tue, 1, true),
        (DayId::Tue, 1, false),
    ]);
    assert_eq!(day_task_counts(&two_thirds, DayId::Tue).percent, 67);
    assert_eq!(day_task_counts(&two_thirds, DayId::Wed), TaskCounts::default());
}

#[test]
fn only_completed_tasks_contribute_points() {
    let plan = plan_with(&[
        (DayId::Mon, 3, true),
        (DayId::Mon, 5, false),
        (DayId::Sun, 4, true),
    ]);

    assert_eq!(total_completed_points(&plan), 7);
    assert_eq!(completed_points_for_day(&plan, DayId::Mon), 3);
    assert_eq!(completed_points_for_day(&plan, DayId::Sun), 4);
    assert_eq!(completed_points_for_day(&plan, DayId::Wed), 0);
}

#[test]
fn goal_progress_is_clamped_and_safe_for_zero_goals() {
    assert_eq!(progress_percent(5, 10), 50);
    assert_eq!(progress_percent(1, 3), 33);
    assert_eq!(progress_percent(30, 10), 100);
    assert_eq!(progress_percent(4, 0), 0);

    let plan = plan_with(&[(DayId::Thu, 12, true), (DayId::Fri, 8, true)]);
    let mut settings = AppSettings::default();
    assert_eq!(daily_goal_progress(&plan, DayId::Thu, &settings), 100);
    assert_eq!(daily_goal_progress(&plan, DayId::Fri, &settings), 80);
    assert_eq!(weekly_goal_progress(&plan, &settings), 40);

    settings.goals.weekly_goal = 0;
    assert_eq!(weekly_goal_progress(&plan, &settings), 0);
}
