//! Persistence backend configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which repository implementation backs the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON files under `data_dir`
    #[default]
    Json,
    /// Process memory, lost on restart
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" | "file" => Ok(StorageBackend::Json),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

/// JSON file store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Selected backend
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding one `<collection>.json` file per collection
    pub data_dir: PathBuf,

    /// Age in milliseconds after which a lock file is considered abandoned
    pub lock_timeout_ms: u64,

    /// Lock acquisition retries after the first attempt
    pub max_retries: u32,

    /// Base retry delay in milliseconds, doubled on every retry
    pub retry_delay_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: PathBuf::from("./data"),
            lock_timeout_ms: 5000,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl StorageConfig {
    /// JSON store rooted at `data_dir` with default lock settings
    pub fn json(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageBackend::Json,
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }
}
