//! Load/save adapter between `TaskStore` snapshots and key-value storage.
//!
//! # Invariants
//! - The bridge starts in `LoadPhase::Pending`; `save` is a no-op until a
//!   load attempt finishes, whatever its result.
//! - `save` always writes the whole collection (last write wins).
//! - Log events carry counts and timings only, never task titles.

use super::codec;
use super::{StorageReadError, StorageWriteError};
use crate::kv::KeyValueStorage;
use crate::model::collection::TaskCollection;
use log::{error, info, warn};
use std::time::Instant;

/// Storage key holding the serialized task list.
pub const DEFAULT_STORAGE_KEY: &str = "todoList";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// No load attempt has finished yet; saves are skipped.
    Pending,
    /// A load attempt finished (successfully or not); saves go through.
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// The collection was not written because `load` has not finished.
    SkippedBeforeLoad,
}

pub struct PersistenceBridge<S> {
    storage: S,
    key: String,
    phase: LoadPhase,
    in_sync: bool,
}

impl<S: KeyValueStorage> PersistenceBridge<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            phase: LoadPhase::Pending,
            in_sync: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loaded(&self) -> bool {
        self.phase == LoadPhase::Loaded
    }

    /// Whether durable storage is known to mirror the last collection seen
    /// by this bridge (via a successful load or save).
    pub fn is_in_sync(&self) -> bool {
        self.in_sync
    }

    /// Reads the stored collection, degrading any failure to an empty one.
    pub async fn load(&mut self) -> TaskCollection {
        match self.try_load().await {
            Ok(collection) => collection,
            Err(_) => {
                warn!(
                    "event=task_load module=persistence status=degraded key={} fallback=empty",
                    self.key
                );
                TaskCollection::new()
            }
        }
    }

    /// Reads the stored collection, surfacing the typed read error.
    ///
    /// An absent key or a blank stored value yields an empty collection. The bridge moves to
    /// `LoadPhase::Loaded` whether or not the read succeeds.
    pub async fn try_load(&mut self) -> Result<TaskCollection, StorageReadError> {
        let started_at = Instant::now();
        let result = self.read().await;
        self.phase = LoadPhase::Loaded;
        self.in_sync = result.is_ok();

        match &result {
            Ok(collection) => info!(
                "event=task_load module=persistence status=ok key={} count={} duration_ms={}",
                self.key,
                collection.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=task_load module=persistence status=error key={} duration_ms={} error={}",
                self.key,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Overwrites the stored collection with `collection`.
    ///
    /// Skipped while the initial load is pending so an empty pre-load
    /// state can never clobber persisted data.
    pub async fn save(
        &mut self,
        collection: &TaskCollection,
    ) -> Result<SaveOutcome, StorageWriteError> {
        if self.phase == LoadPhase::Pending {
            warn!(
                "event=task_save module=persistence status=skipped key={} reason=load_pending",
                self.key
            );
            return Ok(SaveOutcome::SkippedBeforeLoad);
        }

        let started_at = Instant::now();
        let result = self.write(collection).await;
        self.in_sync = result.is_ok();

        match &result {
            Ok(()) => info!(
                "event=task_save module=persistence status=ok key={} count={} duration_ms={}",
                self.key,
                collection.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=task_save module=persistence status=error key={} count={} duration_ms={} error={}",
                self.key,
                collection.len(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result.map(|()| SaveOutcome::Written)
    }

    async fn read(&self) -> Result<TaskCollection, StorageReadError> {
        match self
            .storage
            .get(&self.key)
            .await
            .map_err(StorageReadError::Storage)?
        {
            Some(payload) if payload.trim().is_empty() => Ok(TaskCollection::new()),
            Some(payload) => codec::decode(&payload).map_err(StorageReadError::Corrupt),
            None => Ok(TaskCollection::new()),
        }
    }

    async fn write(&self, collection: &TaskCollection) -> Result<(), StorageWriteError> {
        let payload = codec::encode(collection).map_err(StorageWriteError::Encode)?;
        self.storage
            .set(&self.key, payload)
            .await
            .map_err(StorageWriteError::Storage)
    }
}
