//! Core of the single-screen to-do list app.
//! This crate is the single source of truth for task invariants and for
//! how the list is mirrored to on-device key-value storage.

pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod service;
pub mod store;

pub use kv::{
    KeyValueStorage, KvError, KvResult, LazySqliteKeyValueStorage, MemoryKeyValueStorage,
    SqliteKeyValueStorage,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::{CollectionError, TaskCollection};
pub use model::edit::EditState;
pub use model::task::{Task, TaskId, TaskValidationError};
pub use persistence::{
    LoadPhase, PersistenceBridge, SaveOutcome, StorageReadError, StorageWriteError,
    DEFAULT_STORAGE_KEY,
};
pub use service::todo_service::{ActionOutcome, SubmitError, SubmitOutcome, TodoService};
pub use store::task_store::{Change, StoreError, StoreResult, TaskStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
