//! Runtime configuration for a planner session.
//!
//! Values come from defaults, optionally overridden by `WEEKPLAN_*`
//! environment variables.

use crate::logging::default_log_level;
use crate::migrate::{LegacyWeekPolicy, MigrationOptions};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "WEEKPLAN_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "WEEKPLAN_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "WEEKPLAN_LOG_DIR";
pub const ENV_PRESERVE_LEGACY_WEEK: &str = "WEEKPLAN_PRESERVE_LEGACY_WEEK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// SQLite file for snapshots. `None` keeps state in memory only.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory. `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
    pub migration: MigrationOptions,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            migration: MigrationOptions::default(),
        }
    }
}

impl PlannerConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if read(ENV_PRESERVE_LEGACY_WEEK).is_some_and(|value| is_truthy(&value)) {
            config.migration.legacy_week = LegacyWeekPolicy::PreserveRecordedWeek;
        }
        config
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::{PlannerConfig, ENV_DB_PATH, ENV_LOG_LEVEL, ENV_PRESERVE_LEGACY_WEEK};
    use crate::migrate::LegacyWeekPolicy;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn from_lookup_applies_overrides_and_ignores_blanks() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DB_PATH, "/tmp/planner.sqlite3"),
            (ENV_LOG_LEVEL, "   "),
            (ENV_PRESERVE_LEGACY_WEEK, "Yes"),
        ]);
        let config = PlannerConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/planner.sqlite3")));
        assert_eq!(config.log_level, PlannerConfig::default().log_level);
        assert_eq!(config.log_dir, None);
        assert_eq!(
            config.migration.legacy_week,
            LegacyWeekPolicy::PreserveRecordedWeek
        );
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = PlannerConfig::from_lookup(|_| None);
        assert_eq!(config, PlannerConfig::default());
    }
}
