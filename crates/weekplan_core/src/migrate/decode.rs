//! Lenient decoders from untyped stored JSON to domain records.
//!
//! Every function here is total: missing or ill-typed fields fall back to
//! defaults, unusable records are dropped, and nothing panics.

use crate::calendar::{week_label, WeekId};
use crate::model::plan::{DayId, DayPlan, WeekDays, WeeklyPlan};
use crate::model::settings::{AppSettings, ThemeMode};
use crate::model::task::{clamp_points, Priority, Task};
use crate::ordering::sort_in_place;
use chrono::{DateTime, Utc};
use log::warn;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// How decoded task priorities are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PriorityRule {
    /// Keep a recognized stored priority; default missing ones to `normal`.
    Keep,
    /// Records from before priorities existed: everything becomes `normal`.
    ForceNormal,
}

pub(crate) fn decode_settings(value: Option<&Value>) -> AppSettings {
    let mut settings = AppSettings::default();
    let Some(Value::Object(map)) = value else {
        return settings;
    };

    if let Some(mode) = map
        .get("themeSettings")
        .and_then(|theme| theme.get("mode"))
        .and_then(Value::as_str)
        .and_then(ThemeMode::parse)
    {
        settings.theme_settings.mode = mode;
    }

    if let Some(colors) = map.get("colorSettings") {
        let targets = [
            ("primaryColor", &mut settings.color_settings.primary_color),
            ("accentColor", &mut settings.color_settings.accent_color),
            ("backgroundColor", &mut settings.color_settings.background_color),
        ];
        for (key, target) in targets {
            if let Some(color) = non_blank_str(colors.get(key)) {
                *target = color.to_string();
            }
        }
    }

    if let Some(goals) = map.get("goals") {
        if let Some(daily) = number_of(goals.get("dailyGoal")) {
            settings.goals.daily_goal = clamp_points(daily);
        }
        if let Some(weekly) = number_of(goals.get("weeklyGoal")) {
            settings.goals.weekly_goal = clamp_points(weekly);
        }
    }

    if let Some(lock) = map.get("lockPastWeeks").and_then(Value::as_bool) {
        settings.lock_past_weeks = lock;
    }

    settings
}

/// Decodes a `weekId -> plan` map, dropping entries whose key is not a week id.
pub(crate) fn decode_week_map(
    value: Option<&Value>,
    now: DateTime<Utc>,
) -> BTreeMap<WeekId, WeeklyPlan> {
    let mut weeks = BTreeMap::new();
    let Some(Value::Object(map)) = value else {
        return weeks;
    };

    for (key, plan_value) in map {
        match WeekId::parse(key) {
            Ok(week_id) => {
                let plan = decode_plan(plan_value, week_id, now, PriorityRule::Keep);
                weeks.insert(week_id, plan);
            }
            Err(err) => {
                warn!(
                    "event=state_migrate module=migrate status=skip reason=bad_week_key error={err}"
                );
            }
        }
    }
    weeks
}

/// Decodes one plan and files it under `week_id`, whatever the stored
/// record claims its week to be.
pub(crate) fn decode_plan(
    value: &Value,
    week_id: WeekId,
    now: DateTime<Utc>,
    rule: PriorityRule,
) -> WeeklyPlan {
    let id = id_of(value.get("id")).unwrap_or_else(|| Uuid::new_v4().to_string());
    let created_at = parse_timestamp(value.get("createdAt")).unwrap_or(now);
    let columns = index_day_columns(value.get("days"));

    let mut days = WeekDays::empty();
    for day in DayId::ALL {
        *days.get_mut(day) = decode_day(day, columns.get(&day).copied(), now, rule);
    }

    WeeklyPlan {
        id,
        week_id,
        week_label: week_label(week_id),
        created_at,
        days,
    }
}

/// Reads the recorded week id of a stored plan, if it has a valid one.
pub(crate) fn recorded_week_id(value: &Value) -> Option<WeekId> {
    value
        .get("weekId")
        .and_then(Value::as_str)
        .and_then(|text| WeekId::parse(text).ok())
}

// Accepts either `{ mon: {...}, ... }` or `[{ day: "mon", ... }, ...]`.
fn index_day_columns(value: Option<&Value>) -> BTreeMap<DayId, &Value> {
    let mut columns = BTreeMap::new();
    match value {
        Some(Value::Object(map)) => {
            for (key, column) in map {
                if let Some(day) = DayId::parse(key) {
                    columns.entry(day).or_insert(column);
                }
            }
        }
        Some(Value::Array(items)) => {
            for column in items {
                let day = column
                    .get("day")
                    .and_then(Value::as_str)
                    .and_then(DayId::parse);
                if let Some(day) = day {
                    columns.entry(day).or_insert(column);
                }
            }
        }
        _ => {}
    }
    columns
}

fn decode_day(
    day: DayId,
    value: Option<&Value>,
    now: DateTime<Utc>,
    rule: PriorityRule,
) -> DayPlan {
    let mut column = DayPlan::empty(day);
    let Some(value) = value else {
        return column;
    };

    if let Some(label) = non_blank_str(value.get("label")) {
        column.label = label.to_string();
    }

    let raw_tasks = match value {
        Value::Array(items) => Some(items),
        other => other.get("tasks").and_then(Value::as_array),
    };
    let mut seen = HashSet::new();
    for raw in raw_tasks.into_iter().flatten() {
        let Some(mut task) = decode_task(raw, now, rule) else {
            continue;
        };
        if !seen.insert(task.id.clone()) {
            task.id = Uuid::new_v4().to_string();
            seen.insert(task.id.clone());
        }
        column.tasks.push(task);
    }
    sort_in_place(&mut column.tasks);
    column
}

fn decode_task(value: &Value, now: DateTime<Utc>, rule: PriorityRule) -> Option<Task> {
    let Value::Object(map) = value else {
        return None;
    };

    let priority = match rule {
        PriorityRule::ForceNormal => Priority::Normal,
        PriorityRule::Keep => match map.get("priority").and_then(Value::as_str) {
            Some("important") => Priority::Important,
            _ => Priority::Normal,
        },
    };

    Some(Task {
        id: id_of(map.get("id")).unwrap_or_else(|| Uuid::new_v4().to_string()),
        title: str_field(map, "title").trim().to_string(),
        description: non_blank_str(map.get("description")).map(str::to_string),
        points: number_of(map.get("points")).map_or(0, clamp_points),
        completed: map.get("completed").and_then(Value::as_bool).unwrap_or(false),
        priority,
        created_at: parse_timestamp(map.get("createdAt")).unwrap_or(now),
    })
}

/// Accepts RFC 3339 strings and epoch-millisecond numbers.
pub(crate) fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(text) => DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|ms| ms.is_finite()).map(|ms| ms as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn number_of(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn id_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
