//! Core domain logic for the weekly planner.
//! This crate is the single source of truth for planner invariants.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod migrate;
pub mod model;
pub mod ordering;
pub mod repo;
pub mod service;
pub mod stats;

pub use calendar::{
    add_weeks, compare_week_ids, current_week_id, date_to_week_id, is_past_week,
    week_id_to_monday, week_label, WeekId, WeekIdError,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PlannerConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use migrate::{
    detect_shape, migrate_state, LegacyWeekPolicy, MigrationOptions, StoredShape, StoredState,
    CURRENT_SCHEMA_VERSION,
};
pub use model::plan::{DayId, DayPlan, WeekDays, WeeklyPlan};
pub use model::settings::{
    AppSettings, ColorSettings, Goals, SettingsPatch, ThemeMode, ThemeSettings,
};
pub use model::state::RepositoryState;
pub use model::task::{clamp_points, NewTask, Priority, Task, TaskId, TaskPatch};
pub use ordering::sort_tasks;
pub use repo::plan_repo::{MutationOutcome, SubscriptionId, TaskRef, WeeklyPlanRepository};
pub use repo::state_store::{SqliteStateStore, StateStore, StoreError, StoreResult};
pub use service::planner_service::PlannerSession;
pub use stats::TaskCounts;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
