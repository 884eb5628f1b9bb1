use chrono::NaiveDate;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use weekplan_core::{
    Clock, DayId, FixedClock, MigrationOptions, NewTask, PlannerSession, RepositoryState,
    SqliteStateStore, StateStore, StoreResult, StoredState, WeekId, CURRENT_SCHEMA_VERSION,
};

fn clock_on(y: i32, m: u32, d: u32) -> FixedClock {
    FixedClock::at_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn week(text: &str) -> WeekId {
    WeekId::parse(text).unwrap()
}

fn open_session(store: &Rc<SqliteStateStore>, clock: &FixedClock) -> PlannerSession {
    PlannerSession::bootstrap(
        Rc::clone(store) as Rc<dyn StateStore>,
        Rc::new(clock.clone()),
        &MigrationOptions::default(),
    )
    .unwrap()
}

fn write_payload(path: &Path, payload: &str) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute(
        "INSERT INTO app_state (key, payload) VALUES ('planner', ?1)
         ON CONFLICT(key) DO UPDATE SET payload = excluded.payload;",
        [payload],
    )
    .unwrap();
}

/// Store whose reads always fail; counts write attempts.
#[derive(Default)]
struct UnreadableStore {
    saves: Cell<usize>,
}

impl StateStore for UnreadableStore {
    fn load(&self) -> StoreResult<Option<StoredState>> {
        Err(rusqlite::Error::InvalidQuery.into())
    }

    fn save(&self, _state: &RepositoryState) -> StoreResult<()> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[test]
fn empty_store_loads_nothing() {
    let store = SqliteStateStore::open_in_memory().unwrap();
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn save_writes_versioned_envelope() {
    let store = Rc::new(SqliteStateStore::open_in_memory().unwrap());
    let clock = clock_on(2024, 3, 6);
    let session = open_session(&store, &clock);

    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.version, CURRENT_SCHEMA_VERSION);
    let state = stored.state.unwrap();
    assert_eq!(state["currentWeekId"], "2024-W10");
    assert!(state["weeks"]["2024-W10"]["days"]["mon"]["tasks"].is_array());
    assert_eq!(state["settings"]["themeSettings"]["mode"], "system");
    assert_eq!(session.repo().current_week_id(), week("2024-W10"));
}

#[test]
fn every_commit_is_flushed_to_the_store() {
    let store = Rc::new(SqliteStateStore::open_in_memory().unwrap());
    let clock = clock_on(2024, 3, 6);
    let mut session = open_session(&store, &clock);

    let task = session
        .repo_mut()
        .add_task(DayId::Fri, NewTask::new("Pay rent").with_points(1.0));
    session.repo_mut().go_to_next_week();

    let stored = store.load().unwrap().unwrap().state.unwrap();
    assert_eq!(stored["currentWeekId"], "2024-W11");
    assert!(stored["weeks"]["2024-W11"].is_object());
    let friday = stored["weeks"]["2024-W10"]["days"]["fri"]["tasks"]
        .as_array()
        .unwrap();
    assert!(friday.iter().any(|item| item["id"] == task.id.as_str()));
}

#[test]
fn reopening_a_file_store_resumes_saved_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weekplan.sqlite3");
    let clock = clock_on(2024, 3, 6);

    let task_id = {
        let store = Rc::new(SqliteStateStore::open(&path).unwrap());
        let mut session = open_session(&store, &clock);
        session
            .repo_mut()
            .add_task(DayId::Sun, NewTask::new("Meal prep"))
            .id
    };

    let store = Rc::new(SqliteStateStore::open(&path).unwrap());
    let session = open_session(&store, &clock);
    let plan = session.repo().current_plan();
    assert!(plan.day(DayId::Sun).task(&task_id).is_some());
    assert_eq!(session.repo().state().weeks.len(), 1);
}

#[test]
fn unparseable_payload_starts_a_fresh_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.sqlite3");
    drop(SqliteStateStore::open(&path).unwrap());
    write_payload(&path, "not json at all");

    let store = Rc::new(SqliteStateStore::open(&path).unwrap());
    assert_eq!(
        store.load().unwrap(),
        Some(StoredState {
            version: 0,
            state: None,
        })
    );

    let clock = clock_on(2024, 3, 6);
    let session = open_session(&store, &clock);
    assert_eq!(session.repo().state().weeks.len(), 1);
    assert!(session.repo().current_plan().task_count() > 0);
}

#[test]
fn failed_read_is_returned_without_touching_the_store() {
    let store = Rc::new(UnreadableStore::default());
    let clock = clock_on(2024, 3, 6);

    let result = PlannerSession::bootstrap(
        Rc::clone(&store) as Rc<dyn StateStore>,
        Rc::new(clock),
        &MigrationOptions::default(),
    );

    assert!(result.is_err());
    assert_eq!(store.saves.get(), 0);
}

#[test]
fn flush_writes_current_state_on_demand() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flush.sqlite3");
    let store = Rc::new(SqliteStateStore::open(&path).unwrap());
    let clock = clock_on(2024, 3, 6);
    let session = open_session(&store, &clock);

    write_payload(&path, "null");
    assert_eq!(store.load().unwrap().unwrap().state, None);
    session.flush().unwrap();

    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.version, CURRENT_SCHEMA_VERSION);
    assert_eq!(stored.state.unwrap()["currentWeekId"], "2024-W10");
}

#[test]
fn week_lock_only_applies_to_past_weeks_when_enabled() {
    let store = Rc::new(SqliteStateStore::open_in_memory().unwrap());
    let clock = clock_on(2024, 3, 6);
    let mut session = open_session(&store, &clock);

    assert!(!session.is_week_locked(week("2024-W09")));

    session
        .repo_mut()
        .update_settings(&weekplan_core::SettingsPatch {
            lock_past_weeks: Some(true),
            ..Default::default()
        });
    assert!(session.is_week_locked(week("2024-W09")));
    assert!(session.is_week_locked(week("2023-W52")));
    assert!(!session.is_week_locked(week("2024-W10")));
    assert!(!session.is_week_locked(week("2024-W11")));

    clock.advance(chrono::TimeDelta::weeks(1));
    assert_eq!(session.today_week_id(), week("2024-W11"));
    assert!(session.is_week_locked(week("2024-W10")));
    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 13).unwrap());
}
