//! In-memory task store.
//!
//! # Responsibility
//! - Hold the session's current `TaskCollection`.
//! - Apply add/update/toggle/remove as copy-on-write transitions.
//!
//! # Invariants
//! - Every mutation swaps in a fresh snapshot; snapshots handed out earlier
//!   are never modified.
//! - Failed mutations leave the current snapshot untouched.
//! - Generated ids never collide with an id already in the collection.

use crate::model::collection::TaskCollection;
use crate::model::task::{Task, TaskId, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Logical failures of store mutations. None of them is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(TaskValidationError),
    NotFound(TaskId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Result of a successful mutation.
///
/// `task` is the added/updated/toggled task, or the removed one for
/// `remove`. `snapshot` is the full collection to hand to persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub task: Task,
    pub snapshot: TaskCollection,
}

#[derive(Debug, Default)]
pub struct TaskStore {
    current: TaskCollection,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> &TaskCollection {
        &self.current
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.current.get(id)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Appends a new open task with a freshly generated id.
    pub fn add(&mut self, title: &str) -> StoreResult<Change> {
        let mut task = Task::new(title)?;
        while self.current.contains(&task.id) {
            task.id = TaskId::generate();
        }

        let snapshot = self.current.appended(task.clone());
        Ok(self.commit(task, snapshot))
    }

    /// Replaces the title of `id`, keeping completion state and position.
    pub fn update(&mut self, id: &TaskId, title: &str) -> StoreResult<Change> {
        let index = self.index_of(id)?;
        let task = self.current.as_slice()[index].retitled(title)?;
        let snapshot = self.current.replaced_at(index, task.clone());
        Ok(self.commit(task, snapshot))
    }

    /// Flips the completion flag of `id`.
    pub fn toggle_completed(&mut self, id: &TaskId) -> StoreResult<Change> {
        let index = self.index_of(id)?;
        let task = self.current.as_slice()[index].toggled();
        let snapshot = self.current.replaced_at(index, task.clone());
        Ok(self.commit(task, snapshot))
    }

    /// Removes exactly one task by id and returns it.
    pub fn remove(&mut self, id: &TaskId) -> StoreResult<Change> {
        let index = self.index_of(id)?;
        let task = self.current.as_slice()[index].clone();
        let snapshot = self.current.removed_at(index);
        Ok(self.commit(task, snapshot))
    }

    /// Seeds the store with a restored collection in one step.
    pub fn replace_all(&mut self, collection: TaskCollection) {
        self.current = collection;
    }

    fn index_of(&self, id: &TaskId) -> StoreResult<usize> {
        self.current
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn commit(&mut self, task: Task, snapshot: TaskCollection) -> Change {
        self.current = snapshot.clone();
        Change { task, snapshot }
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreError, TaskStore};
    use crate::model::task::{TaskId, TaskValidationError};

    #[test]
    fn add_rejects_blank_title_without_touching_state() {
        let mut store = TaskStore::new();
        let err = store.add("   ").unwrap_err();
        assert_eq!(err, StoreError::Validation(TaskValidationError::EmptyTitle));
        assert!(store.is_empty());
    }

    #[test]
    fn earlier_snapshots_survive_later_mutations() {
        let mut store = TaskStore::new();
        let first = store.add("one").unwrap();
        let second = store.toggle_completed(&first.task.id).unwrap();

        assert!(!first.snapshot.as_slice()[0].completed);
        assert!(second.snapshot.as_slice()[0].completed);
    }

    #[test]
    fn update_missing_id_reports_not_found() {
        let mut store = TaskStore::new();
        store.add("one").unwrap();
        let err = store.update(&TaskId::new("ghost"), "two").unwrap_err();
        assert_eq!(err, StoreError::NotFound(TaskId::new("ghost")));
    }
}
