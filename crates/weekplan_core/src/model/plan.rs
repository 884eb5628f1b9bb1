//! Day and week plan models.
//!
//! # Responsibility
//! - Define the seven fixed day columns and the weekly plan that owns them.
//!
//! # Invariants
//! - A `WeeklyPlan` holds exactly one `DayPlan` per `DayId`; the seven
//!   columns are named fields, so gaps and duplicates cannot be expressed.
//! - `week_label` is always derived from `week_id`.
//! - Every column's task list is in `ordering::sort_tasks` order at rest.

use crate::calendar::{week_label, WeekId};
use crate::model::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed day-of-week column identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayId {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayId {
    /// All days in Monday-first order.
    pub const ALL: [DayId; 7] = [
        DayId::Mon,
        DayId::Tue,
        DayId::Wed,
        DayId::Thu,
        DayId::Fri,
        DayId::Sat,
        DayId::Sun,
    ];

    /// Storage key (`mon`..`sun`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
            Self::Sun => "sun",
        }
    }

    /// Default display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Mon => "Monday",
            Self::Tue => "Tuesday",
            Self::Wed => "Wednesday",
            Self::Thu => "Thursday",
            Self::Fri => "Friday",
            Self::Sat => "Saturday",
            Self::Sun => "Sunday",
        }
    }

    /// Accepts storage keys and full weekday names, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|day| {
            day.as_str() == normalized || day.label().eq_ignore_ascii_case(&normalized)
        })
    }
}

/// Ordered task column for one day of a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: DayId,
    pub label: String,
    pub tasks: Vec<Task>,
}

impl DayPlan {
    pub fn empty(day: DayId) -> Self {
        Self {
            day,
            label: day.label().to_string(),
            tasks: Vec::new(),
        }
    }

    /// Index of the task with `task_id`, if present.
    pub fn position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == task_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }
}

/// The seven day columns of one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDays {
    pub mon: DayPlan,
    pub tue: DayPlan,
    pub wed: DayPlan,
    pub thu: DayPlan,
    pub fri: DayPlan,
    pub sat: DayPlan,
    pub sun: DayPlan,
}

impl WeekDays {
    pub fn empty() -> Self {
        Self {
            mon: DayPlan::empty(DayId::Mon),
            tue: DayPlan::empty(DayId::Tue),
            wed: DayPlan::empty(DayId::Wed),
            thu: DayPlan::empty(DayId::Thu),
            fri: DayPlan::empty(DayId::Fri),
            sat: DayPlan::empty(DayId::Sat),
            sun: DayPlan::empty(DayId::Sun),
        }
    }

    pub fn get(&self, day: DayId) -> &DayPlan {
        match day {
            DayId::Mon => &self.mon,
            DayId::Tue => &self.tue,
            DayId::Wed => &self.wed,
            DayId::Thu => &self.thu,
            DayId::Fri => &self.fri,
            DayId::Sat => &self.sat,
            DayId::Sun => &self.sun,
        }
    }

    pub fn get_mut(&mut self, day: DayId) -> &mut DayPlan {
        match day {
            DayId::Mon => &mut self.mon,
            DayId::Tue => &mut self.tue,
            DayId::Wed => &mut self.wed,
            DayId::Thu => &mut self.thu,
            DayId::Fri => &mut self.fri,
            DayId::Sat => &mut self.sat,
            DayId::Sun => &mut self.sun,
        }
    }

    /// Columns in Monday-first order.
    pub fn iter(&self) -> impl Iterator<Item = &DayPlan> {
        DayId::ALL.into_iter().map(move |day| self.get(day))
    }
}

/// One week's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub id: String,
    pub week_id: WeekId,
    pub week_label: String,
    pub created_at: DateTime<Utc>,
    pub days: WeekDays,
}

impl WeeklyPlan {
    /// Builds a plan with seven empty columns and a fresh id.
    pub fn empty(week_id: WeekId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            week_id,
            week_label: week_label(week_id),
            created_at,
            days: WeekDays::empty(),
        }
    }

    pub fn day(&self, day: DayId) -> &DayPlan {
        self.days.get(day)
    }

    pub fn day_mut(&mut self, day: DayId) -> &mut DayPlan {
        self.days.get_mut(day)
    }

    /// All tasks of the week, Monday first.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.days.iter().flat_map(|day| day.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.days.iter().map(|day| day.tasks.len()).sum()
    }
}
