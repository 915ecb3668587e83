//! FFI use-case API for the Flutter to-do screen.
//!
//! # Responsibility
//! - Expose the list screen's actions (load, submit, edit, toggle, delete)
//!   as stable functions for Dart via FRB.
//! - Own the process-wide `TodoService` and its SQLite storage handle.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The edit state lives on the Dart side and is passed in explicitly as
//!   `editing_id`; this module keeps no "currently editing" field.
//! - Storage that cannot be opened never blocks the screen: the list starts
//!   empty, actions apply in memory and report `persisted=false`.
//! - A missing task id is a silent no-op (`ok=true`, no item), since the
//!   task may already have been removed by an earlier tap.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ActionOutcome, EditState, LazySqliteKeyValueStorage, SaveOutcome, StoreError, Task, TaskId,
    TodoService,
};
use tokio::sync::{Mutex, OnceCell};

const STORAGE_DB_FILE_NAME: &str = "todo_list.sqlite3";
const STORAGE_PATH_ENV: &str = "TODO_DB_PATH";

static STORAGE_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: OnceCell<Mutex<TodoService<LazySqliteKeyValueStorage>>> = OnceCell::const_new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may create the log directory.
/// - Idempotent for the same `level + log_dir`.
/// - Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Sets the SQLite file used for the task list.
///
/// Must be called before the first `todo_*` call; typically with a path
/// inside the app documents directory. Without it, `TODO_DB_PATH` or the
/// system temp directory is used.
///
/// # FFI contract
/// - Sync call, no I/O.
/// - Repeating the same path is accepted; a different path after the
///   first resolution is rejected.
/// - Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_storage_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "storage path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = STORAGE_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "storage path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Label for the submit control: `Add` when idle, `Update` when editing.
#[flutter_rust_bridge::frb(sync)]
pub fn submit_label(editing_id: Option<String>) -> String {
    edit_state(editing_id).submit_label().to_string()
}

/// One list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// Full list envelope for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    pub ok: bool,
    /// Rows in display order.
    pub items: Vec<TodoItem>,
    pub message: String,
}

/// Envelope for single-task actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    /// Whether the action was accepted.
    pub ok: bool,
    /// Affected task; `None` for no-ops on missing ids.
    pub item: Option<TodoItem>,
    /// Whether the new list reached durable storage.
    pub persisted: bool,
    /// Edit state the UI should adopt (`None` = idle).
    pub editing_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl TodoActionResponse {
    fn applied(message: impl Into<String>, outcome: ActionOutcome) -> Self {
        Self {
            ok: true,
            item: Some(to_item(&outcome.task)),
            persisted: outcome.persisted,
            editing_id: None,
            message: message.into(),
        }
    }

    fn noop(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            item: None,
            persisted: false,
            editing_id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>, editing_id: Option<String>) -> Self {
        Self {
            ok: false,
            item: None,
            persisted: false,
            editing_id,
            message: message.into(),
        }
    }
}

/// Envelope for entering edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoEditResponse {
    pub ok: bool,
    /// Id to pass back as `editing_id` on submit.
    pub editing_id: Option<String>,
    /// Current title to prefill the input field.
    pub title: String,
    pub submit_label: String,
    pub message: String,
}

/// Loads the stored list (first call) and returns all rows.
///
/// # FFI contract
/// - Async call, DB-backed.
/// - Unreadable stored data or unopenable storage degrades to an empty
///   list with `ok=true`.
/// - Never panics.
pub async fn todo_load() -> TodoListResponse {
    let mut service = session().await.lock().await;
    let items = service.start().await.iter().map(to_item).collect::<Vec<_>>();
    let message = if !service.bridge().is_in_sync() {
        format!("Loaded {} task(s); storage unavailable.", items.len())
    } else if items.is_empty() {
        "No tasks.".to_string()
    } else {
        format!("Loaded {} task(s).", items.len())
    };
    TodoListResponse {
        ok: true,
        items,
        message,
    }
}

/// Returns all rows; identical to `todo_load` after the first call.
pub async fn todo_list() -> TodoListResponse {
    todo_load().await
}

/// Handles the single submit control.
///
/// Input semantics:
/// - `text`: input field content; surrounding whitespace is trimmed.
/// - `editing_id`: `None` adds a task, `Some(id)` renames that task.
///
/// # FFI contract
/// - Blank text is rejected with `ok=false`; `editing_id` echoes the
///   unchanged edit state.
/// - Renaming a task that no longer exists is a no-op that ends editing.
pub async fn todo_submit(text: String, editing_id: Option<String>) -> TodoActionResponse {
    let state = edit_state(editing_id);
    let mut service = session().await.lock().await;
    match service.submit(&state, text.as_str()).await {
        Ok(outcome) => {
            let message = if state.is_editing() {
                "Task updated."
            } else {
                "Task added."
            };
            TodoActionResponse {
                ok: true,
                item: Some(to_item(&outcome.task)),
                persisted: outcome.persisted,
                editing_id: outcome.next_state.editing_id().map(|id| id.to_string()),
                message: message.to_string(),
            }
        }
        Err(rejected) => match rejected.error {
            StoreError::NotFound(_) => TodoActionResponse::noop("Task no longer exists."),
            StoreError::Validation(err) => TodoActionResponse::failure(
                format!("todo_submit rejected: {err}"),
                rejected.next_state.editing_id().map(|id| id.to_string()),
            ),
        },
    }
}

/// Enters edit mode for one task.
pub async fn todo_begin_edit(id: String) -> TodoEditResponse {
    let idle = |message: String| TodoEditResponse {
        ok: true,
        editing_id: None,
        title: String::new(),
        submit_label: EditState::Idle.submit_label().to_string(),
        message,
    };

    let mut service = session().await.lock().await;
    match service.begin_edit(&TaskId::new(id)).await {
        Ok((state, title)) => TodoEditResponse {
            ok: true,
            editing_id: state.editing_id().map(|id| id.to_string()),
            title,
            submit_label: state.submit_label().to_string(),
            message: "Editing task.".to_string(),
        },
        Err(_) => idle("Task no longer exists.".to_string()),
    }
}

/// Flips completion of one task.
pub async fn todo_toggle(id: String) -> TodoActionResponse {
    let mut service = session().await.lock().await;
    match service.toggle_completed(&TaskId::new(id)).await {
        Ok(outcome) => TodoActionResponse::applied("Task toggled.", outcome),
        Err(err) => missing_or_failure("todo_toggle", err),
    }
}

/// Deletes one task; deleting a missing id is a no-op.
pub async fn todo_delete(id: String) -> TodoActionResponse {
    let mut service = session().await.lock().await;
    match service.remove(&TaskId::new(id)).await {
        Ok(outcome) => TodoActionResponse::applied("Task deleted.", outcome),
        Err(err) => missing_or_failure("todo_delete", err),
    }
}

/// Re-attempts persisting the current list, e.g. when the app is paused.
pub async fn todo_flush() -> TodoActionResponse {
    let mut service = session().await.lock().await;
    match service.flush().await {
        Ok(SaveOutcome::Written) => TodoActionResponse {
            persisted: true,
            ..TodoActionResponse::noop("Tasks saved.")
        },
        Ok(SaveOutcome::SkippedBeforeLoad) => TodoActionResponse::noop("Tasks not loaded yet."),
        Err(err) => TodoActionResponse::failure(format!("todo_flush failed: {err}"), None),
    }
}

async fn session() -> &'static Mutex<TodoService<LazySqliteKeyValueStorage>> {
    SESSION
        .get_or_init(|| async {
            let storage = LazySqliteKeyValueStorage::new(resolve_storage_path());
            Mutex::new(TodoService::new(storage))
        })
        .await
}

fn resolve_storage_path() -> PathBuf {
    STORAGE_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORAGE_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORAGE_DB_FILE_NAME)
        })
        .clone()
}

fn edit_state(editing_id: Option<String>) -> EditState {
    EditState::from_editing_id(
        editing_id
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(TaskId::new),
    )
}

fn missing_or_failure(operation: &str, err: StoreError) -> TodoActionResponse {
    match err {
        StoreError::NotFound(_) => TodoActionResponse::noop("Task no longer exists."),
        other => {
            warn!("event={operation} module=ffi status=rejected error={other}");
            TodoActionResponse::failure(format!("{operation} failed: {other}"), None)
        }
    }
}

fn to_item(task: &Task) -> TodoItem {
    TodoItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        completed: task.completed,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_storage_path, core_version, init_logging, ping, submit_label, todo_begin_edit,
        todo_delete, todo_list, todo_submit, todo_toggle,
    };
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DB: OnceLock<String> = OnceLock::new();

    fn use_test_db() {
        let path = TEST_DB.get_or_init(|| {
            std::env::temp_dir()
                .join(format!("todo-ffi-{}-{}", std::process::id(), nanos()))
                .join("todo.sqlite3")
                .to_string_lossy()
                .into_owned()
        });
        assert_eq!(configure_storage_path(path.clone()), "");
    }

    fn nanos() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn configure_storage_path_rejects_switching() {
        use_test_db();
        assert!(!configure_storage_path("  ".to_string()).is_empty());
        assert!(!configure_storage_path("/elsewhere/todo.sqlite3".to_string()).is_empty());
    }

    #[test]
    fn submit_label_follows_editing_id() {
        assert_eq!(submit_label(None), "Add");
        assert_eq!(submit_label(Some("  ".to_string())), "Add");
        assert_eq!(submit_label(Some("abc".to_string())), "Update");
    }

    #[tokio::test]
    async fn submit_edit_toggle_delete_flow() {
        use_test_db();
        let title = format!("task-{}", nanos());

        let added = todo_submit(format!("  {title}  "), None).await;
        assert!(added.ok, "{}", added.message);
        let item = added.item.expect("added item");
        assert_eq!(item.title, title);
        assert!(!item.completed);
        assert_eq!(added.editing_id, None);

        let edit = todo_begin_edit(item.id.clone()).await;
        assert!(edit.ok);
        assert_eq!(edit.title, title);
        assert_eq!(edit.submit_label, "Update");

        let renamed = todo_submit(format!("{title} v2"), edit.editing_id.clone()).await;
        assert!(renamed.ok, "{}", renamed.message);
        assert_eq!(renamed.editing_id, None);
        assert_eq!(renamed.item.expect("renamed item").id, item.id);

        let toggled = todo_toggle(item.id.clone()).await;
        assert!(toggled.item.expect("toggled item").completed);

        let listed = todo_list().await;
        assert!(listed
            .items
            .iter()
            .any(|row| row.id == item.id && row.completed && row.title.ends_with("v2")));

        let deleted = todo_delete(item.id.clone()).await;
        assert!(deleted.ok && deleted.item.is_some());
        let again = todo_delete(item.id.clone()).await;
        assert!(again.ok && again.item.is_none());
    }

    #[tokio::test]
    async fn blank_submit_is_rejected_and_echoes_edit_state() {
        use_test_db();

        let idle = todo_submit("   ".to_string(), None).await;
        assert!(!idle.ok);
        assert_eq!(idle.editing_id, None);

        let added = todo_submit(format!("keep-{}", nanos()), None).await;
        let id = added.item.expect("added item").id;
        let editing = todo_submit(String::new(), Some(id.clone())).await;
        assert!(!editing.ok);
        assert_eq!(editing.editing_id, Some(id));
    }
}
