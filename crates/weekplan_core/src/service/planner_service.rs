//! Planner session: bootstrap and persistence wiring.
//!
//! # Responsibility
//! - Load the stored snapshot, migrate it, and hand the result to a fresh
//!   `WeeklyPlanRepository`.
//! - Subscribe the store to repository commits so every committed state is
//!   flushed.
//! - Answer the read-only week gate for callers that decide whether to
//!   invoke mutations.
//!
//! # Invariants
//! - Bootstrap never fails on stored content; unparseable or unrecognized
//!   snapshots start fresh.
//! - A failed read is returned as an error before anything is written, so a
//!   snapshot that could not be read is never overwritten.
//! - Flush failures are logged and never surface through repository calls.
//! - The gate is advisory: the repository itself enforces nothing.

use crate::calendar::{current_week_id, is_past_week, WeekId};
use crate::clock::{Clock, SystemClock};
use crate::config::PlannerConfig;
use crate::migrate::{migrate_state, MigrationOptions};
use crate::model::state::RepositoryState;
use crate::repo::plan_repo::WeeklyPlanRepository;
use crate::repo::state_store::{SqliteStateStore, StateStore, StoreResult};
use log::{info, warn};
use std::rc::Rc;

/// One planner session: the live repository plus its storage backend.
pub struct PlannerSession {
    repo: WeeklyPlanRepository,
    store: Rc<dyn StateStore>,
    clock: Rc<dyn Clock>,
}

impl PlannerSession {
    /// Opens the configured store with the system clock and bootstraps.
    ///
    /// # Errors
    /// - The store cannot be opened or its snapshot cannot be read.
    pub fn open(config: &PlannerConfig) -> StoreResult<Self> {
        let store: Rc<dyn StateStore> = match &config.db_path {
            Some(path) => Rc::new(SqliteStateStore::open(path)?),
            None => Rc::new(SqliteStateStore::open_in_memory()?),
        };
        Self::bootstrap(store, Rc::new(SystemClock), &config.migration)
    }

    /// Loads, migrates, writes the migrated snapshot back, and wires the
    /// persistence subscriber.
    ///
    /// # Errors
    /// - `store.load()` failed. Nothing is written in that case.
    pub fn bootstrap(
        store: Rc<dyn StateStore>,
        clock: Rc<dyn Clock>,
        options: &MigrationOptions,
    ) -> StoreResult<Self> {
        let stored = store.load().map_err(|err| {
            warn!(
                "event=session_bootstrap module=planner_service status=error error_code=load_failed error={err}"
            );
            err
        })?;
        let (version, value) = stored.map_or((0, None), |stored| (stored.version, stored.state));
        let state = migrate_state(value.as_ref(), version, clock.as_ref(), options);
        persist(store.as_ref(), &state, 0);

        let mut repo = WeeklyPlanRepository::new(state, Rc::clone(&clock));
        let sink = Rc::clone(&store);
        repo.subscribe(move |state, revision| persist(sink.as_ref(), state, revision));

        info!(
            "event=session_bootstrap module=planner_service status=ok current_week={}",
            repo.current_week_id()
        );
        Ok(Self { repo, store, clock })
    }

    pub fn repo(&self) -> &WeeklyPlanRepository {
        &self.repo
    }

    pub fn repo_mut(&mut self) -> &mut WeeklyPlanRepository {
        &mut self.repo
    }

    /// Week containing today's date.
    pub fn today_week_id(&self) -> WeekId {
        current_week_id(self.clock.as_ref())
    }

    /// Whether callers should treat `week_id` as read-only.
    ///
    /// True when `lock_past_weeks` is on and `week_id` is before today's week.
    pub fn is_week_locked(&self, week_id: WeekId) -> bool {
        self.repo.settings().lock_past_weeks && is_past_week(week_id, self.today_week_id())
    }

    /// Synchronously writes the current state, surfacing any error.
    pub fn flush(&self) -> StoreResult<()> {
        self.store.save(self.repo.state())
    }

    pub fn into_state(self) -> RepositoryState {
        self.repo.into_state()
    }
}

fn persist(store: &dyn StateStore, state: &RepositoryState, revision: u64) {
    if let Err(err) = store.save(state) {
        warn!(
            "event=state_flush module=planner_service status=error revision={revision} error={err}"
        );
    }
}
