//! Persisted key-value store trait.

use crate::error::Result;

/// Persisted key-value store.
///
/// Holds two string keys: the launch flag and the session token. There is no
/// schema beyond presence or absence.
pub trait KeyValueStore: Send + Sync {
    /// Read `key`.
    ///
    /// # Returns
    ///
    /// The stored value, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Storage` if the store cannot be read.
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;

    /// Write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Storage` if the store cannot be written.
    fn set(&self, key: &str, value: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Storage` if the store cannot be written.
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}
