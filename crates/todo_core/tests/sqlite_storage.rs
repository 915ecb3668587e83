use rusqlite::Connection;
use todo_core::db::migrations::latest_version;
use todo_core::db::{open_db, open_db_in_memory, DbError};
use todo_core::{KeyValueStorage, LazySqliteKeyValueStorage, SqliteKeyValueStorage, TodoService};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app").join("data").join("todo.sqlite3");

    let conn = open_db(&path).unwrap();

    assert!(path.exists());
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn reopening_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite3");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();

    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn get_set_overwrite_semantics() {
    let storage = SqliteKeyValueStorage::open_in_memory().unwrap();

    assert_eq!(storage.get("todoList").await.unwrap(), None);
    storage.set("todoList", "[]".to_string()).await.unwrap();
    storage
        .set("todoList", r#"[{"id":"1","title":"a","completed":false}]"#.to_string())
        .await
        .unwrap();

    assert_eq!(
        storage.get("todoList").await.unwrap().as_deref(),
        Some(r#"[{"id":"1","title":"a","completed":false}]"#)
    );
}

#[tokio::test]
async fn task_list_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite3");

    let task_id = {
        let mut service = TodoService::new(SqliteKeyValueStorage::open(&path).unwrap());
        service.start().await;
        let added = service.add("Buy milk").await.unwrap();
        service.toggle_completed(&added.task.id).await.unwrap();
        added.task.id
    };

    let mut service = TodoService::new(SqliteKeyValueStorage::open(&path).unwrap());
    let restored = service.start().await;
    let task = restored.get(&task_id).unwrap();
    assert_eq!(task.title, "Buy milk");
    assert!(task.completed);
}

#[tokio::test]
async fn unopenable_database_degrades_to_in_memory_list() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("regular-file");
    std::fs::write(&blocker, "not a directory").unwrap();
    let mut service = TodoService::new(LazySqliteKeyValueStorage::new(
        blocker.join("todo.sqlite3"),
    ));

    assert!(service.start().await.is_empty());
    assert!(service.is_started());

    let added = service.add("Buy milk").await.unwrap();
    assert!(!added.persisted);
    let toggled = service.toggle_completed(&added.task.id).await.unwrap();
    assert!(toggled.task.completed);
    assert_eq!(service.tasks().len(), 1);
    assert!(!service.bridge().is_in_sync());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
