//! Repository layer: in-memory planner state and its storage backend.
//!
//! # Responsibility
//! - `plan_repo` owns live state and every mutation over it.
//! - `state_store` persists committed snapshots.
//!
//! # Invariants
//! - The repository never reads storage; loading and migration happen before
//!   it is constructed.
//! - Storage failures never reach repository callers.

pub mod plan_repo;
pub mod state_store;
