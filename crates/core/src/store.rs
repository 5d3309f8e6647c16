//! KeyValueStore trait — the persistence collaborator.
//!
//! A deliberately small contract: put/get/delete of JSON-serializable
//! values by key. No transactions, no durability guarantees beyond what
//! the implementation offers. Implementations: in-memory (with a
//! capacity limit) and file-backed.

use async_trait::async_trait;

use crate::error::StoreError;

/// The key-value persistence trait.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// The store name (e.g., "in_memory", "file").
    fn name(&self) -> &str;

    /// Write a value. Fails with [`StoreError::CapacityExceeded`] when
    /// the serialized value is larger than the store allows; the store's
    /// previous contents for the key are left untouched in that case.
    async fn put(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> std::result::Result<(), StoreError>;

    /// Read a value, or `None` if the key is absent.
    async fn get(&self, key: &str)
        -> std::result::Result<Option<serde_json::Value>, StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> std::result::Result<(), StoreError>;
}
