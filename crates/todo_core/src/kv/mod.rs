//! Asynchronous key-value storage contract.
//!
//! # Responsibility
//! - Model the platform key-value service as an opaque async `get`/`set`.
//! - Provide an in-memory backend (tests, previews) and a SQLite backend
//!   (on-device durability).
//!
//! # Invariants
//! - `set` overwrites any previous value for the key.
//! - `get` of a never-written key is `Ok(None)`, not an error.

use crate::db::DbError;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryKeyValueStorage;
pub use sqlite::{LazySqliteKeyValueStorage, SqliteKeyValueStorage};

pub type KvResult<T> = Result<T, KvError>;

#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    /// Backend could not serve the call (injected fault, poisoned lock,
    /// cancelled blocking task).
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> KvResult<Option<String>>;
    async fn set(&self, key: &str, value: String) -> KvResult<()>;
}

#[async_trait]
impl<S: KeyValueStorage + ?Sized> KeyValueStorage for std::sync::Arc<S> {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        (**self).set(key, value).await
    }
}
