//! Configuration loading and validation for PBLForge.
//!
//! Loads configuration from `~/.pblforge/config.toml` with environment
//! variable overrides (`GEMINI_API_KEY`, `PBLFORGE_MODEL`,
//! `PBLFORGE_DATA_DIR`). Every field has a serde default so an empty
//! file — or no file at all — yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The root configuration structure.
///
/// Maps directly to `~/.pblforge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation backend API key. Usually supplied via `GEMINI_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model served by the generation backend.
    #[serde(default = "default_model")]
    pub model: String,

    /// Agent sampling settings.
    #[serde(default)]
    pub agents: AgentConfig,

    /// Document ingestion settings.
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            agents: AgentConfig::default(),
            ingest: IngestConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

/// Per-agent sampling temperatures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Architect (assignment generation).
    #[serde(default = "default_generation_temperature")]
    pub generation_temperature: f32,

    /// Mentor (submission evaluation).
    #[serde(default = "default_evaluation_temperature")]
    pub evaluation_temperature: f32,
}

fn default_generation_temperature() -> f32 {
    0.7
}
fn default_evaluation_temperature() -> f32 {
    0.5
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            generation_temperature: default_generation_temperature(),
            evaluation_temperature: default_evaluation_temperature(),
        }
    }
}

/// Document ingestion limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// PDF pages extracted per file; pages beyond this are omitted.
    #[serde(default = "default_max_pdf_pages")]
    pub max_pdf_pages: u32,
}

fn default_max_pdf_pages() -> u32 {
    30
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_pdf_pages: default_max_pdf_pages(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the file-backed store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Per-value size limit in bytes. Oversized writes are rejected, not
    /// truncated.
    #[serde(default = "default_max_value_bytes")]
    pub max_value_bytes: usize,
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".pblforge").join("store")
}

fn default_max_value_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_value_bytes: default_max_value_bytes(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("agents", &self.agents)
            .field("ingest", &self.ingest)
            .field("storage", &self.storage)
            .finish()
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl AppConfig {
    /// Default config file path: `~/.pblforge/config.toml`.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".pblforge").join("config.toml")
    }

    /// Load configuration from the given path, falling back to defaults
    /// when the file is absent, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).map_err(|e| ConfigError {
                message: format!("invalid config at {}: {e}", path.display()),
            })?,
            Err(_) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables win over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("PBLFORGE_MODEL") {
            if !model.is_empty() {
                self.model = model;
            }
        }
        if let Ok(dir) = std::env::var("PBLFORGE_DATA_DIR") {
            if !dir.is_empty() {
                self.storage.data_dir = PathBuf::from(dir);
            }
        }
    }
}

/// Configuration failure.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}
