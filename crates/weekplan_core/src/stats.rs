//! Plan statistics projections.
//!
//! Pure functions over a plan snapshot; nothing is cached on the plan, so
//! results always reflect the latest commit.

use crate::model::plan::{DayId, DayPlan, WeeklyPlan};
use crate::model::settings::AppSettings;
use serde::Serialize;

/// Completed/total task counts with a rounded completion percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskCounts {
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
}

/// Sum of points over completed tasks of the whole week.
pub fn total_completed_points(plan: &WeeklyPlan) -> u64 {
    plan.days.iter().map(completed_points).sum()
}

/// Sum of points over completed tasks of one day.
pub fn completed_points_for_day(plan: &WeeklyPlan, day: DayId) -> u64 {
    completed_points(plan.day(day))
}

pub fn task_counts(plan: &WeeklyPlan) -> TaskCounts {
    let (completed, total) = plan
        .days
        .iter()
        .map(column_counts)
        .fold((0, 0), |(done, all), (d, a)| (done + d, all + a));
    counts(completed, total)
}

pub fn day_task_counts(plan: &WeeklyPlan, day: DayId) -> TaskCounts {
    let (completed, total) = column_counts(plan.day(day));
    counts(completed, total)
}

/// `min(100, round(value / goal * 100))`; `0` when `goal` is zero.
pub fn progress_percent(value: u64, goal: u64) -> u32 {
    if goal == 0 {
        return 0;
    }
    rounded_percent(value as f64 / goal as f64).min(100)
}

pub fn daily_goal_progress(plan: &WeeklyPlan, day: DayId, settings: &AppSettings) -> u32 {
    progress_percent(
        completed_points_for_day(plan, day),
        u64::from(settings.goals.daily_goal),
    )
}

pub fn weekly_goal_progress(plan: &WeeklyPlan, settings: &AppSettings) -> u32 {
    progress_percent(
        total_completed_points(plan),
        u64::from(settings.goals.weekly_goal),
    )
}

fn completed_points(column: &DayPlan) -> u64 {
    column
        .tasks
        .iter()
        .filter(|task| task.completed)
        .map(|task| u64::from(task.points))
        .sum()
}

fn column_counts(column: &DayPlan) -> (usize, usize) {
    let completed = column.tasks.iter().filter(|task| task.completed).count();
    (completed, column.tasks.len())
}

fn counts(completed: usize, total: usize) -> TaskCounts {
    let percent = if total == 0 {
        0
    } else {
        rounded_percent(completed as f64 / total as f64)
    };
    TaskCounts {
        completed,
        total,
        percent,
    }
}

fn rounded_percent(ratio: f64) -> u32 {
    let percent = (ratio * 100.0).round();
    if percent >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        percent as u32
    }
}
