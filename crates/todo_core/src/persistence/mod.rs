//! Durable mirror of the task list.
//!
//! # Responsibility
//! - Load the whole collection from key-value storage once at startup.
//! - Overwrite the stored collection after every change.
//! - Design out the save-before-load race.
//!
//! # Invariants
//! - No write reaches storage before `load` has completed or failed.
//! - Failures are logged and returned, never panicked on; the in-memory
//!   store is never rolled back.

pub mod bridge;
pub mod codec;

pub use bridge::{LoadPhase, PersistenceBridge, SaveOutcome, DEFAULT_STORAGE_KEY};

use crate::kv::KvError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Durable read failed or returned undecodable data.
#[derive(Debug)]
pub enum StorageReadError {
    Storage(KvError),
    Corrupt(serde_json::Error),
}

impl Display for StorageReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "failed to read task list: {err}"),
            Self::Corrupt(err) => write!(f, "stored task list is corrupt: {err}"),
        }
    }
}

impl Error for StorageReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Corrupt(err) => Some(err),
        }
    }
}

/// Durable write failed.
#[derive(Debug)]
pub enum StorageWriteError {
    Storage(KvError),
    Encode(serde_json::Error),
}

impl Display for StorageWriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "failed to write task list: {err}"),
            Self::Encode(err) => write!(f, "failed to encode task list: {err}"),
        }
    }
}

impl Error for StorageWriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}
