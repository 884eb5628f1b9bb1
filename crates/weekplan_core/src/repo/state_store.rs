//! State snapshot storage contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the versioned `{ version, state }` envelope under one key.
//! - Hand back whatever was stored as untyped JSON so the migrator decides
//!   how to interpret it.
//!
//! # Invariants
//! - `save` replaces the whole snapshot; there is no partial write.
//! - `load` never rejects stored content: unparseable payload text comes back
//!   as an empty `StoredState` and is logged.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::migrate::{PersistedEnvelope, StoredState};
use crate::model::state::RepositoryState;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const STATE_KEY: &str = "planner";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error from snapshot persistence.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode planner state: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Storage backend for planner snapshots.
pub trait StateStore {
    /// Loads the stored snapshot, or `None` when nothing was ever saved.
    fn load(&self) -> StoreResult<Option<StoredState>>;
    /// Replaces the stored snapshot with `state` at the current schema version.
    fn save(&self, state: &RepositoryState) -> StoreResult<()>;
}

/// SQLite-backed snapshot store.
pub struct SqliteStateStore {
    conn: Connection,
}

impl SqliteStateStore {
    /// Opens (or creates) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    fn write_payload(&self, payload: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO app_state (key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![STATE_KEY, payload],
        )?;
        Ok(())
    }
}

impl StateStore for SqliteStateStore {
    fn load(&self) -> StoreResult<Option<StoredState>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM app_state WHERE key = ?1;",
                [STATE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str::<serde_json::Value>(&payload) {
            Ok(document) => Ok(Some(StoredState::from_document(document))),
            Err(err) => {
                warn!(
                    "event=state_load module=state_store status=error error_code=payload_not_json error={err}"
                );
                Ok(Some(StoredState {
                    version: 0,
                    state: None,
                }))
            }
        }
    }

    fn save(&self, state: &RepositoryState) -> StoreResult<()> {
        let payload = serde_json::to_string(&PersistedEnvelope::current(state))?;
        self.write_payload(&payload)
    }
}
