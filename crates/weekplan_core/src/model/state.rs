//! Whole-store state snapshot.

use crate::calendar::WeekId;
use crate::model::plan::WeeklyPlan;
use crate::model::settings::AppSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the repository owns: the active week pointer, every visited
/// week's plan and the settings.
///
/// `weeks` only grows; entries are created lazily and never evicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryState {
    pub current_week_id: WeekId,
    pub weeks: BTreeMap<WeekId, WeeklyPlan>,
    pub settings: AppSettings,
}

impl RepositoryState {
    pub fn current_plan(&self) -> Option<&WeeklyPlan> {
        self.weeks.get(&self.current_week_id)
    }
}
