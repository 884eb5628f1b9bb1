//! Planner domain model.
//!
//! # Responsibility
//! - Define the task, day column, weekly plan, settings and store snapshot shapes.
//! - Own the serde layout of the persisted state (camelCase keys, `mon`..`sun` columns).
//!
//! # Invariants
//! - A task is owned by exactly one day column of exactly one weekly plan.
//! - Model types carry no I/O; all mutation flows through `repo::plan_repo`.

pub mod plan;
pub mod settings;
pub mod state;
pub mod task;
