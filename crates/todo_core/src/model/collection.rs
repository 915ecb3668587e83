//! Ordered task collection value.
//!
//! # Responsibility
//! - Hold an ordered, id-unique sequence of tasks.
//! - Provide copy-on-write transforms used by `TaskStore`.
//!
//! # Invariants
//! - Ids are pairwise unique and non-empty; every constructor enforces it,
//!   including deserialization.
//! - Transforms return a new value and never mutate `self`.

use super::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural violations when building a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    DuplicateId(TaskId),
    EmptyId { index: usize },
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate task id `{id}`"),
            Self::EmptyId { index } => write!(f, "task at index {index} has an empty id"),
        }
    }
}

impl Error for CollectionError {}

/// Ordered sequence of tasks, serialized as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Task>", into = "Vec<Task>")]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection, rejecting duplicate or empty ids.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, CollectionError> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for (index, task) in tasks.iter().enumerate() {
            if task.id.is_empty() {
                return Err(CollectionError::EmptyId { index });
            }
            if !seen.insert(&task.id) {
                return Err(CollectionError::DuplicateId(task.id.clone()));
            }
        }
        Ok(Self { tasks })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    /// Returns a copy with `task` appended.
    ///
    /// Callers must ensure the id is not present yet.
    pub(crate) fn appended(&self, task: Task) -> Self {
        debug_assert!(!self.contains(&task.id));
        let mut tasks = Vec::with_capacity(self.tasks.len() + 1);
        tasks.extend(self.tasks.iter().cloned());
        tasks.push(task);
        Self { tasks }
    }

    /// Returns a copy where the task at `index` is replaced in place.
    pub(crate) fn replaced_at(&self, index: usize, task: Task) -> Self {
        let tasks = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, existing)| {
                if i == index {
                    task.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        Self { tasks }
    }

    /// Returns a copy without the task at `index`.
    pub(crate) fn removed_at(&self, index: usize) -> Self {
        let tasks = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, task)| task.clone())
            .collect();
        Self { tasks }
    }
}

impl TryFrom<Vec<Task>> for TaskCollection {
    type Error = CollectionError;

    fn try_from(value: Vec<Task>) -> Result<Self, Self::Error> {
        Self::from_tasks(value)
    }
}

impl From<TaskCollection> for Vec<Task> {
    fn from(value: TaskCollection) -> Self {
        value.tasks
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
