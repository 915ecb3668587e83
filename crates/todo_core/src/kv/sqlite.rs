//! SQLite-backed key-value backend.
//!
//! # Invariants
//! - One row per key in `kv_entries`; `set` is an upsert.
//! - SQLite calls run on the blocking pool, never on the async caller.

use super::{KeyValueStorage, KvError, KvResult};
use crate::db::{open_db, open_db_in_memory, DbResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

#[derive(Clone)]
pub struct SqliteKeyValueStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKeyValueStorage {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, f: F) -> KvResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> KvResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| KvError::Unavailable("sqlite connection lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|err| KvError::Unavailable(format!("blocking storage task failed: {err}")))?
    }
}

#[async_trait]
impl KeyValueStorage for SqliteKeyValueStorage {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_entries WHERE key = ?1;",
                    [key.as_str()],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![key, value],
            )?;
            Ok(())
        })
        .await
    }
}

/// SQLite backend that opens its database on first use.
///
/// A failed open surfaces as `KvError` from that `get`/`set` call and is
/// attempted again on the next one, so an unusable path degrades to
/// read/write errors instead of leaving the caller without storage.
pub struct LazySqliteKeyValueStorage {
    path: PathBuf,
    opened: OnceCell<SqliteKeyValueStorage>,
}

impl LazySqliteKeyValueStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            opened: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.opened.initialized()
    }

    async fn storage(&self) -> KvResult<&SqliteKeyValueStorage> {
        self.opened
            .get_or_try_init(|| async {
                let path = self.path.clone();
                let opened = tokio::task::spawn_blocking(move || SqliteKeyValueStorage::open(path))
                    .await
                    .map_err(|err| KvError::Unavailable(format!("blocking open task failed: {err}")))?;
                opened.map_err(|err| {
                    warn!(
                        "event=kv_open module=kv status=error path={} error={err}",
                        self.path.display()
                    );
                    KvError::Db(err)
                })
            })
            .await
    }
}

#[async_trait]
impl KeyValueStorage for LazySqliteKeyValueStorage {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.storage().await?.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        self.storage().await?.set(key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::LazySqliteKeyValueStorage;
    use crate::kv::{KeyValueStorage, KvError};

    #[tokio::test]
    async fn unusable_path_fails_each_call_without_opening() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let storage = LazySqliteKeyValueStorage::new(blocker.join("todo.sqlite3"));

        assert!(matches!(storage.get("todoList").await, Err(KvError::Db(_))));
        assert!(matches!(
            storage.set("todoList", "[]".to_string()).await,
            Err(KvError::Db(_))
        ));
        assert!(!storage.is_open());
    }

    #[tokio::test]
    async fn opens_on_first_use_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("todo.sqlite3");
        let storage = LazySqliteKeyValueStorage::new(&path);
        assert!(!storage.is_open());

        storage.set("todoList", "[]".to_string()).await.unwrap();

        assert!(storage.is_open());
        assert!(path.exists());
        assert_eq!(storage.get("todoList").await.unwrap().as_deref(), Some("[]"));
    }
}
