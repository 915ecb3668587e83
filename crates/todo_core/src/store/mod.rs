//! Session state for the task list.
//!
//! # Responsibility
//! - Own the single in-memory source of truth for the current session.
//! - Keep persistence out of mutation paths; callers persist snapshots.

pub mod task_store;
