//! Task domain model.
//!
//! # Responsibility
//! - Define the single persisted entity of the to-do list.
//! - Own id generation and title validation rules.
//!
//! # Invariants
//! - `id` is non-empty, stable and never reused for another task.
//! - Titles accepted from user input are non-empty after trimming.
//! - `completed` starts as `false`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque stable identifier of a task.
///
/// Generated ids are random UUID v4 strings. Ids restored from storage are
/// kept verbatim, so payloads written with older id schemes stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh 128-bit random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an externally provided id.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// Id is the empty string.
    EmptyId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::EmptyId => write!(f, "task id cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do entry.
///
/// Serialized with exactly three fields: `id`, `title`, `completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}

impl Task {
    /// Creates an open task with a generated id.
    ///
    /// The title is trimmed before validation.
    pub fn new(title: &str) -> Result<Self, TaskValidationError> {
        Self::with_id(TaskId::generate(), title)
    }

    /// Creates an open task with a caller-provided id.
    pub fn with_id(id: TaskId, title: &str) -> Result<Self, TaskValidationError> {
        if id.is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        Ok(Self {
            id,
            title: normalize_title(title)?,
            completed: false,
        })
    }

    /// Returns a copy carrying `title`, keeping id and completion state.
    pub fn retitled(&self, title: &str) -> Result<Self, TaskValidationError> {
        Ok(Self {
            id: self.id.clone(),
            title: normalize_title(title)?,
            completed: self.completed,
        })
    }

    /// Returns a copy with the completion flag flipped.
    pub fn toggled(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            completed: !self.completed,
        }
    }
}

/// Trims user input and rejects empty titles.
pub fn normalize_title(title: &str) -> Result<String, TaskValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}
