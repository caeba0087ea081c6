//! Persistent token store trait.

use async_trait::async_trait;

use crate::error::StoreError;

/// A durable key/value string store.
///
/// The session manager keeps at most one token in it, under a fixed key.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
