//! In-process key-value backend.

use super::{KeyValueStorage, KvError, KvResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Map-backed storage with switchable read/write faults.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStorage {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `get` fail until switched off.
    pub fn fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    /// Makes every following `set` fail until switched off.
    pub fn fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }

    /// Reads a raw value bypassing fault injection.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryKeyValueStorage {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable(format!("read of `{key}` rejected")));
        }
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable(format!("write of `{key}` rejected")));
        }
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKeyValueStorage;
    use crate::kv::{KeyValueStorage, KvError};

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let storage = MemoryKeyValueStorage::new();
        assert_eq!(storage.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_and_faults_are_switchable() {
        let storage = MemoryKeyValueStorage::new();
        storage.set("k", "one".to_string()).await.unwrap();
        storage.set("k", "two".to_string()).await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("two"));

        storage.fail_writes(true);
        let err = storage.set("k", "three".to_string()).await.unwrap_err();
        assert!(matches!(err, KvError::Unavailable(_)));
        assert_eq!(storage.peek("k").await.as_deref(), Some("two"));

        storage.fail_writes(false);
        storage.fail_reads(true);
        assert!(storage.get("k").await.is_err());
    }
}
