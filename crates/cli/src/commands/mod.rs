//! CLI command implementations.

pub mod evaluate;
pub mod generate;
pub mod hint;
pub mod kb;
pub mod stage;

use anyhow::Context;
use pblforge_config::AppConfig;
use pblforge_core::backend::GenerationBackend;
use pblforge_ingest::UploadedFile;
use pblforge_providers::GeminiBackend;
use pblforge_store::{FileStore, Repository};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Open the file-backed repository under the configured data dir.
pub(crate) fn open_repository(config: &AppConfig) -> Repository {
    let store = FileStore::new(config.storage.data_dir.clone())
        .with_capacity_limit(config.storage.max_value_bytes);
    Repository::new(Arc::new(store))
}

/// Build the configured generation backend. Fails when no API key is
/// available (config file or `GEMINI_API_KEY`).
pub(crate) fn backend(config: &AppConfig) -> anyhow::Result<Arc<dyn GenerationBackend>> {
    let api_key = config
        .api_key
        .clone()
        .context("no API key configured; set GEMINI_API_KEY or api_key in config.toml")?;
    Ok(Arc::new(GeminiBackend::new(api_key, config.model.clone())))
}

/// Read local files into uploads for the staging queue.
pub(crate) async fn read_uploads(paths: &[PathBuf]) -> anyhow::Result<Vec<UploadedFile>> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?;
        uploads.push(UploadedFile::new(file_name_of(path), None, data));
    }
    Ok(uploads)
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
