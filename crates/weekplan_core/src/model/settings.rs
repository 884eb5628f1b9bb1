//! Application settings model.
//!
//! # Invariants
//! - Goals are non-negative integers (clamped like task points).
//! - Settings change field-by-field through `SettingsPatch`; blank colors are ignored.

use crate::model::task::clamp_points;
use serde::{Deserialize, Serialize};

const DEFAULT_PRIMARY_COLOR: &str = "#6366f1";
const DEFAULT_ACCENT_COLOR: &str = "#f59e0b";
const DEFAULT_BACKGROUND_COLOR: &str = "#f8fafc";
const DEFAULT_DAILY_GOAL: u32 = 10;
const DEFAULT_WEEKLY_GOAL: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub mode: ThemeMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSettings {
    pub primary_color: String,
    pub accent_color: String,
    pub background_color: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
        }
    }
}

/// Point targets used by progress projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    pub daily_goal: u32,
    pub weekly_goal: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            daily_goal: DEFAULT_DAILY_GOAL,
            weekly_goal: DEFAULT_WEEKLY_GOAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme_settings: ThemeSettings,
    pub color_settings: ColorSettings,
    pub goals: Goals,
    /// Read by the external read-only gate; never enforced by the repository.
    pub lock_past_weeks: bool,
}

/// Field-by-field settings update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub theme_mode: Option<ThemeMode>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
    pub daily_goal: Option<f64>,
    pub weekly_goal: Option<f64>,
    pub lock_past_weeks: Option<bool>,
}

impl AppSettings {
    /// Returns a copy with `patch` merged in.
    pub fn patched(&self, patch: &SettingsPatch) -> Self {
        let mut next = self.clone();
        if let Some(mode) = patch.theme_mode {
            next.theme_settings.mode = mode;
        }
        merge_color(&mut next.color_settings.primary_color, &patch.primary_color);
        merge_color(&mut next.color_settings.accent_color, &patch.accent_color);
        merge_color(&mut next.color_settings.background_color, &patch.background_color);
        if let Some(goal) = patch.daily_goal {
            next.goals.daily_goal = clamp_points(goal);
        }
        if let Some(goal) = patch.weekly_goal {
            next.goals.weekly_goal = clamp_points(goal);
        }
        if let Some(lock) = patch.lock_past_weeks {
            next.lock_past_weeks = lock;
        }
        next
    }
}

fn merge_color(target: &mut String, value: &Option<String>) {
    if let Some(color) = value {
        let trimmed = color.trim();
        if !trimmed.is_empty() {
            *target = trimmed.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppSettings, SettingsPatch, ThemeMode};

    #[test]
    fn patched_merges_fields_and_clamps_goals() {
        let settings = AppSettings::default();
        let next = settings.patched(&SettingsPatch {
            theme_mode: Some(ThemeMode::Dark),
            accent_color: Some("  ".to_string()),
            primary_color: Some(" #112233 ".to_string()),
            daily_goal: Some(-5.0),
            weekly_goal: Some(f64::NAN),
            ..SettingsPatch::default()
        });

        assert_eq!(next.theme_settings.mode, ThemeMode::Dark);
        assert_eq!(next.color_settings.primary_color, "#112233");
        assert_eq!(next.color_settings.accent_color, settings.color_settings.accent_color);
        assert_eq!(next.goals.daily_goal, 0);
        assert_eq!(next.goals.weekly_goal, 0);
        assert!(!next.lock_past_weeks);
    }

    #[test]
    fn settings_serialize_in_persisted_layout() {
        let value = serde_json::to_value(AppSettings::default()).unwrap();
        assert_eq!(value["themeSettings"]["mode"], "system");
        assert_eq!(value["goals"]["dailyGoal"], 10);
        assert_eq!(value["lockPastWeeks"], false);
        assert!(value["colorSettings"]["backgroundColor"].is_string());
    }
}
