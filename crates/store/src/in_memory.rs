//! In-memory store — useful for testing and ephemeral sessions.
//!
//! Carries the same per-value capacity limit as the file backend so
//! promotion-too-large failures are reproducible in tests.

use async_trait::async_trait;
use pblforge_core::error::StoreError;
use pblforge_core::store::KeyValueStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory store backed by a HashMap.
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, serde_json::Value>>>,
    max_value_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            max_value_bytes: None,
        }
    }

    /// Reject writes whose serialized value exceeds `limit` bytes.
    pub fn with_capacity_limit(mut self, limit: usize) -> Self {
        self.max_value_bytes = Some(limit);
        self
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        if let Some(limit) = self.max_value_bytes {
            let size = serde_json::to_string(&value)
                .map_err(|e| StoreError::Serialization(e.to_string()))?
                .len();
            if size > limit {
                return Err(StoreError::CapacityExceeded {
                    key: key.to_string(),
                    size_bytes: size,
                    limit_bytes: limit,
                });
            }
        }
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_get_delete_roundtrip() {
        let store = MemoryStore::new();
        store.put("k", json!({"a": 1})).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"a": 1})));

        store.delete("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_absent_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_absent_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.delete("missing").await.is_ok());
    }

    #[tokio::test]
    async fn oversized_put_is_rejected_and_leaves_old_value() {
        let store = MemoryStore::new().with_capacity_limit(64);
        store.put("k", json!("small")).await.unwrap();

        let big = "x".repeat(200);
        let err = store.put("k", json!(big)).await.unwrap_err();
        assert!(matches!(err, StoreError::CapacityExceeded { .. }));

        // Previous value untouched
        assert_eq!(store.get("k").await.unwrap(), Some(json!("small")));
    }
}
