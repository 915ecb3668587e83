//! Explicit edit-mode state for the submit flow.
//!
//! The presentation layer owns one `EditState` value and passes it into
//! `TodoService::submit`; the core never keeps an implicit "currently
//! editing" field.

use super::task::TaskId;

/// Label shown on the submit control while no edit is in progress.
pub const ADD_LABEL: &str = "Add";
/// Label shown on the submit control while editing a task.
pub const UPDATE_LABEL: &str = "Update";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    /// Submitting creates a new task.
    #[default]
    Idle,
    /// Submitting replaces the title of the given task.
    Editing(TaskId),
}

impl EditState {
    /// Builds the state from an optional id as passed over FFI.
    pub fn from_editing_id(editing_id: Option<TaskId>) -> Self {
        match editing_id {
            Some(id) => Self::Editing(id),
            None => Self::Idle,
        }
    }

    pub fn editing_id(&self) -> Option<&TaskId> {
        match self {
            Self::Idle => None,
            Self::Editing(id) => Some(id),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            Self::Idle => ADD_LABEL,
            Self::Editing(_) => UPDATE_LABEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EditState;
    use crate::model::task::TaskId;

    #[test]
    fn submit_label_follows_state() {
        assert_eq!(EditState::Idle.submit_label(), "Add");
        assert_eq!(
            EditState::Editing(TaskId::new("1")).submit_label(),
            "Update"
        );
    }

    #[test]
    fn from_editing_id_maps_none_to_idle() {
        assert_eq!(EditState::from_editing_id(None), EditState::Idle);
        let state = EditState::from_editing_id(Some(TaskId::new("7")));
        assert_eq!(state.editing_id(), Some(&TaskId::new("7")));
        assert!(state.is_editing());
    }
}
