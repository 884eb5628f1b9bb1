//! Core use-case services.
//!
//! # Responsibility
//! - Assemble storage, migration and the repository into a usable session.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod planner_service;
