//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define the `Task` entity and the ordered `TaskCollection` value.
//! - Define the explicit `EditState` used by the submit flow.
//!
//! # Invariants
//! - Every task is identified by a stable, unique `TaskId`.
//! - Collections are values: transforms produce new collections.

pub mod collection;
pub mod edit;
pub mod task;
