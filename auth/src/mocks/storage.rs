//! Mock key-value stores for testing.

use crate::error::{FlowError, Result};
use crate::providers::KeyValueStore;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// In-memory key-value store.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// a reducer wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `key = value`.
    #[must_use]
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Current value of `key` (for testing).
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn value(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| FlowError::Internal("Mutex lock failed".to_string()))?
            .get(key)
            .cloned())
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        let result = self.value(key);
        async move { result }
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send {
        let entries = Arc::clone(&self.entries);
        let key = key.to_string();
        let value = value.to_string();

        async move {
            entries
                .lock()
                .map_err(|_| FlowError::Internal("Mutex lock failed".to_string()))?
                .insert(key, value);
            Ok(())
        }
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        let entries = Arc::clone(&self.entries);
        let key = key.to_string();

        async move {
            entries
                .lock()
                .map_err(|_| FlowError::Internal("Mutex lock failed".to_string()))?
                .remove(&key);
            Ok(())
        }
    }
}

/// Key-value store whose every operation fails.
#[derive(Debug, Clone, Default)]
pub struct FailingKeyValueStore;

impl FailingKeyValueStore {
    fn error(operation: &str, key: &str) -> FlowError {
        FlowError::Storage(format!("{operation} {key}: storage unavailable"))
    }
}

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        let error = Self::error("get", key);
        async move { Err(error) }
    }

    fn set(&self, key: &str, _value: &str) -> impl Future<Output = Result<()>> + Send {
        let error = Self::error("set", key);
        async move { Err(error) }
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        let error = Self::error("remove", key);
        async move { Err(error) }
    }
}

/// Key-value store that serves reads from a backing map and fails every write.
///
/// Models storage that can be read but not persisted to, such as a full disk.
#[derive(Debug, Clone, Default)]
pub struct ReadOnlyKeyValueStore {
    inner: InMemoryKeyValueStore,
}

impl ReadOnlyKeyValueStore {
    /// Serve reads from `inner`.
    #[must_use]
    pub const fn new(inner: InMemoryKeyValueStore) -> Self {
        Self { inner }
    }
}

impl KeyValueStore for ReadOnlyKeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        self.inner.get(key)
    }

    fn set(&self, key: &str, _value: &str) -> impl Future<Output = Result<()>> + Send {
        let error = FailingKeyValueStore::error("set", key);
        async move { Err(error) }
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        let error = FailingKeyValueStore::error("remove", key);
        async move { Err(error) }
    }
}
