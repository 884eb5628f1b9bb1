//! Task domain model.
//!
//! # Responsibility
//! - Define the task record stored in day columns.
//! - Normalize user input (trim text, clamp points) at construction and patch time.
//!
//! # Invariants
//! - `points` is always a non-negative integer.
//! - `title` never carries leading/trailing whitespace.
//! - `description` is `None` rather than blank.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task identifier, unique within its day column.
///
/// Kept as a plain string so records carried over from older stores keep
/// their original ids.
pub type TaskId = String;

/// Task priority tier. `Important` tasks sort ahead of `Normal` ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Normal,
    Important,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Important => "important",
        }
    }
}

/// One planned task inside a day column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub points: u32,
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

/// Caller input for creating a task.
///
/// `points` is accepted as a float so non-integral, negative or non-finite
/// input can be clamped instead of rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub points: f64,
    pub priority: Priority,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            points: 0.0,
            priority: Priority::Normal,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = points;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Partial update for an existing task. `None` fields are left untouched.
///
/// A blank `description` clears the stored description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub points: Option<f64>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    /// Returns whether applying this patch can change the sort position.
    pub fn touches_order(&self) -> bool {
        self.priority.is_some()
    }
}

impl Task {
    /// Builds a fresh, not-yet-completed task from caller input.
    pub fn from_input(input: NewTask, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title.trim().to_string(),
            description: normalize_description(input.description),
            points: clamp_points(input.points),
            completed: false,
            priority: input.priority,
            created_at,
        }
    }

    /// Returns a copy with `patch` merged in and normalized.
    pub fn patched(&self, patch: &TaskPatch) -> Self {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            next.description = normalize_description(Some(description.clone()));
        }
        if let Some(points) = patch.points {
            next.points = clamp_points(points);
        }
        if let Some(completed) = patch.completed {
            next.completed = completed;
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        next
    }
}

/// Clamps arbitrary numeric input to a non-negative integer point value.
///
/// Rounds to nearest; NaN and infinities become `0`; negatives become `0`.
pub fn clamp_points(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let rounded = value.round();
    if rounded <= 0.0 {
        0
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}

fn normalize_description(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
