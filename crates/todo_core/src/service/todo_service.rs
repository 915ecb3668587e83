//! To-do list use-case service.
//!
//! # Responsibility
//! - Seed the in-memory store from durable storage exactly once.
//! - Apply user actions to the store and explicitly persist each new
//!   snapshot.
//! - Drive the add-or-update submit flow from an explicit `EditState`.
//!
//! # Invariants
//! - The initial load always finishes before the first mutation, so no
//!   mutation is ever lost to a late load or skipped save.
//! - Persistence failures never fail a user action; they are reported via
//!   `persisted = false` and healed by a later save or `flush`.

use crate::kv::KeyValueStorage;
use crate::model::collection::TaskCollection;
use crate::model::edit::EditState;
use crate::model::task::{Task, TaskId};
use crate::persistence::{PersistenceBridge, SaveOutcome, StorageWriteError};
use crate::store::task_store::{Change, StoreError, StoreResult, TaskStore};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result of a successful user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Task after the action (the removed task for deletes).
    pub task: Task,
    /// Whether the new snapshot reached durable storage.
    pub persisted: bool,
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub task: Task,
    pub persisted: bool,
    /// Always `EditState::Idle`; the edit is finished.
    pub next_state: EditState,
}

/// Rejected submit, with the edit state the caller should adopt.
///
/// A blank title keeps the current state so the user can fix the input.
/// Editing a task that no longer exists drops back to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    pub error: StoreError,
    pub next_state: EditState,
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

pub struct TodoService<S> {
    store: TaskStore,
    bridge: PersistenceBridge<S>,
}

impl<S: KeyValueStorage> TodoService<S> {
    /// Creates a service persisting under the default storage key.
    pub fn new(storage: S) -> Self {
        Self::with_bridge(PersistenceBridge::new(storage))
    }

    pub fn with_bridge(bridge: PersistenceBridge<S>) -> Self {
        Self {
            store: TaskStore::new(),
            bridge,
        }
    }

    pub fn bridge(&self) -> &PersistenceBridge<S> {
        &self.bridge
    }

    pub fn is_started(&self) -> bool {
        self.bridge.is_loaded()
    }

    /// Current snapshot of the list.
    pub fn tasks(&self) -> &TaskCollection {
        self.store.snapshot()
    }

    /// Loads the stored list and seeds the store.
    ///
    /// Later calls return the current snapshot without reloading.
    pub async fn start(&mut self) -> &TaskCollection {
        if !self.bridge.is_loaded() {
            let restored = self.bridge.load().await;
            self.store.replace_all(restored);
            info!(
                "event=service_start module=service status=ok count={}",
                self.store.len()
            );
        }
        self.store.snapshot()
    }

    pub async fn add(&mut self, title: &str) -> StoreResult<ActionOutcome> {
        self.start().await;
        let change = self.store.add(title)?;
        Ok(self.persist("add", change).await)
    }

    pub async fn update(&mut self, id: &TaskId, title: &str) -> StoreResult<ActionOutcome> {
        self.start().await;
        let change = self.store.update(id, title)?;
        Ok(self.persist("update", change).await)
    }

    pub async fn toggle_completed(&mut self, id: &TaskId) -> StoreResult<ActionOutcome> {
        self.start().await;
        let change = self.store.toggle_completed(id)?;
        Ok(self.persist("toggle", change).await)
    }

    pub async fn remove(&mut self, id: &TaskId) -> StoreResult<ActionOutcome> {
        self.start().await;
        let change = self.store.remove(id)?;
        Ok(self.persist("remove", change).await)
    }

    /// Handles the single submit control: adds when idle, updates the
    /// edited task otherwise.
    pub async fn submit(
        &mut self,
        state: &EditState,
        input: &str,
    ) -> Result<SubmitOutcome, SubmitError> {
        let result = match state {
            EditState::Idle => self.add(input).await,
            EditState::Editing(id) => self.update(id, input).await,
        };

        match result {
            Ok(outcome) => Ok(SubmitOutcome {
                task: outcome.task,
                persisted: outcome.persisted,
                next_state: EditState::Idle,
            }),
            Err(error) => {
                let next_state = match error {
                    StoreError::Validation(_) => state.clone(),
                    StoreError::NotFound(_) => EditState::Idle,
                };
                debug!(
                    "event=task_submit module=service status=rejected editing={} error={}",
                    state.is_editing(),
                    error
                );
                Err(SubmitError { error, next_state })
            }
        }
    }

    /// Enters edit mode for `id`, returning the title to prefill the input.
    pub async fn begin_edit(&mut self, id: &TaskId) -> StoreResult<(EditState, String)> {
        self.start().await;
        let task = self
            .store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok((EditState::Editing(id.clone()), task.title.clone()))
    }

    /// Re-attempts writing the current snapshot.
    pub async fn flush(&mut self) -> Result<SaveOutcome, StorageWriteError> {
        let snapshot = self.store.snapshot().clone();
        self.bridge.save(&snapshot).await
    }

    async fn persist(&mut self, action: &'static str, change: Change) -> ActionOutcome {
        let persisted = matches!(
            self.bridge.save(&change.snapshot).await,
            Ok(SaveOutcome::Written)
        );
        debug!(
            "event=task_{action} module=service status=ok count={} persisted={persisted}",
            change.snapshot.len()
        );
        ActionOutcome {
            task: change.task,
            persisted,
        }
    }
}
