//! Persisted-state migration.
//!
//! # Responsibility
//! - Turn whatever was stored by any earlier build (nothing, a legacy
//!   single-plan record, or the current multi-week shape) into a valid
//!   `RepositoryState` before the repository goes live.
//! - Define the versioned envelope written back to storage.
//!
//! # Invariants
//! - Migration is total: it never fails and never returns a partial state.
//!   Unrecognized shapes degrade to a fresh state.
//! - Every day column in the result is in `ordering` order.
//! - The result always contains a plan for its `current_week_id`.
//! - Legacy records are filed under the current week by default; the
//!   recorded week id is dropped unless `LegacyWeekPolicy::PreserveRecordedWeek`.

mod decode;
mod seed;

use crate::calendar::{current_week_id, WeekId};
use crate::clock::Clock;
use crate::model::plan::WeeklyPlan;
use crate::model::settings::{AppSettings, ThemeMode};
use crate::model::state::RepositoryState;
use chrono::{DateTime, Utc};
use decode::{decode_plan, decode_settings, decode_week_map, recorded_week_id, PriorityRule};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Version written by this build. Legacy single-plan records predate it.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Where a migrated legacy plan is filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegacyWeekPolicy {
    /// File legacy tasks under the week containing "now".
    #[default]
    ResumeAtCurrentWeek,
    /// Keep legacy tasks under the week id recorded in the record, when valid.
    PreserveRecordedWeek,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MigrationOptions {
    pub legacy_week: LegacyWeekPolicy,
}

/// Shape classification of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredShape {
    /// Nothing stored, or not a JSON object.
    Missing,
    /// Has `weeks`, `currentWeekId` and `settings`.
    Current,
    /// Has a single `plan` object (and usually `darkMode`).
    Legacy,
    /// An object matching neither shape.
    Unrecognized,
}

impl StoredShape {
    fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Current => "current",
            Self::Legacy => "legacy",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Versioned wrapper written to storage.
#[derive(Debug, Serialize)]
pub struct PersistedEnvelope<'a> {
    pub version: u32,
    pub state: &'a RepositoryState,
}

impl<'a> PersistedEnvelope<'a> {
    pub fn current(state: &'a RepositoryState) -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            state,
        }
    }
}

/// A stored envelope split into its declared version and raw state value.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredState {
    pub version: u32,
    pub state: Option<Value>,
}

impl StoredState {
    /// Splits a raw stored document.
    ///
    /// Documents without a `state` key are treated as an unversioned bare
    /// state (version 0).
    pub fn from_document(document: Value) -> Self {
        match document {
            Value::Null => Self {
                version: 0,
                state: None,
            },
            Value::Object(mut map) if map.contains_key("state") => {
                let version = map
                    .get("version")
                    .and_then(Value::as_u64)
                    .and_then(|version| u32::try_from(version).ok())
                    .unwrap_or(0);
                Self {
                    version,
                    state: map.remove("state"),
                }
            }
            other => Self {
                version: 0,
                state: Some(other),
            },
        }
    }
}

/// Classifies a stored value without decoding it.
pub fn detect_shape(value: Option<&Value>) -> StoredShape {
    let Some(Value::Object(map)) = value else {
        return StoredShape::Missing;
    };
    if ["weeks", "currentWeekId", "settings"]
        .iter()
        .all(|key| map.contains_key(*key))
    {
        StoredShape::Current
    } else if map.get("plan").is_some_and(Value::is_object) {
        StoredShape::Legacy
    } else {
        StoredShape::Unrecognized
    }
}

/// Migrates a stored value (plus its declared version) into current state.
pub fn migrate_state(
    stored: Option<&Value>,
    version: u32,
    clock: &dyn Clock,
    options: &MigrationOptions,
) -> RepositoryState {
    let now = clock.now();
    let today_week = current_week_id(clock);
    let shape = detect_shape(stored);

    if version > CURRENT_SCHEMA_VERSION {
        warn!(
            "event=state_migrate module=migrate status=warn reason=newer_version version={} supported={}",
            version, CURRENT_SCHEMA_VERSION
        );
    }

    let mut state = match (shape, stored) {
        (StoredShape::Current, Some(value)) => {
            let stored_week = value
                .get("currentWeekId")
                .and_then(Value::as_str)
                .and_then(|text| WeekId::parse(text).ok())
                .unwrap_or(today_week);
            RepositoryState {
                current_week_id: stored_week,
                weeks: decode_week_map(value.get("weeks"), now),
                settings: decode_settings(value.get("settings")),
            }
        }
        (StoredShape::Legacy, Some(value)) => migrate_legacy(value, today_week, now, options),
        _ => fresh_state(today_week, now),
    };

    let active_week = state.current_week_id;
    state
        .weeks
        .entry(active_week)
        .or_insert_with(|| WeeklyPlan::empty(active_week, now));

    info!(
        "event=state_migrate module=migrate status=ok shape={} from_version={} weeks={} current_week={}",
        shape.as_str(),
        version,
        state.weeks.len(),
        state.current_week_id
    );
    state
}

fn migrate_legacy(
    value: &Value,
    today_week: WeekId,
    now: DateTime<Utc>,
    options: &MigrationOptions,
) -> RepositoryState {
    let Some(plan_value) = value.get("plan") else {
        return fresh_state(today_week, now);
    };

    let target_week = match options.legacy_week {
        LegacyWeekPolicy::ResumeAtCurrentWeek => today_week,
        LegacyWeekPolicy::PreserveRecordedWeek => {
            recorded_week_id(plan_value).unwrap_or(today_week)
        }
    };

    let mut settings = AppSettings::default();
    settings.theme_settings.mode = match value.get("darkMode").and_then(Value::as_bool) {
        Some(true) => ThemeMode::Dark,
        _ => ThemeMode::Light,
    };

    let plan = decode_plan(plan_value, target_week, now, PriorityRule::ForceNormal);
    let mut weeks = BTreeMap::new();
    weeks.insert(target_week, plan);

    RepositoryState {
        current_week_id: today_week,
        weeks,
        settings,
    }
}

fn fresh_state(week_id: WeekId, now: DateTime<Utc>) -> RepositoryState {
    let mut weeks = BTreeMap::new();
    weeks.insert(week_id, seed::demo_plan(week_id, now));
    RepositoryState {
        current_week_id: week_id,
        weeks,
        settings: AppSettings::default(),
    }
}
