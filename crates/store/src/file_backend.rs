//! File-based store — one JSON file per key under a data directory.
//!
//! Simple, portable, human-inspectable. Writes are whole-file replaces;
//! there are no transactions, which matches the collaborator contract.

use async_trait::async_trait;
use pblforge_core::error::StoreError;
use pblforge_core::store::KeyValueStore;
use std::path::PathBuf;
use tracing::debug;

/// A store that keeps each key in `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
    max_value_bytes: Option<usize>,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on the
    /// first write.
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            max_value_bytes: None,
        }
    }

    /// Reject writes whose serialized value exceeds `limit` bytes.
    pub fn with_capacity_limit(mut self, limit: usize) -> Self {
        self.max_value_bytes = Some(limit);
        self
    }

    /// Keys become file names; anything outside `[A-Za-z0-9._-]` is
    /// replaced so a key can never escape the data directory.
    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(&value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(limit) = self.max_value_bytes {
            if serialized.len() > limit {
                return Err(StoreError::CapacityExceeded {
                    key: key.to_string(),
                    size_bytes: serialized.len(),
                    limit_bytes: limit,
                });
            }
        }

        std::fs::create_dir_all(&self.dir)
            .map_err(|e| StoreError::Io(format!("failed to create store dir: {e}")))?;

        let path = self.path_for(key);
        std::fs::write(&path, serialized)
            .map_err(|e| StoreError::Io(format!("failed to write {}: {e}", path.display())))?;
        debug!(key, path = %path.display(), "store write");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.path_for(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        let value =
            serde_json::from_str(&raw).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Some(value))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(format!(
                "failed to delete {}: {e}",
                path.display()
            ))),
        }
    }
}
