//! Storage error types

use std::path::{Path, PathBuf};

use op_core::errors::DomainError;
use thiserror::Error;

/// Failures of the JSON file store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Timed out acquiring lock {path}")]
    LockTimeout { path: PathBuf },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
}

impl StorageError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn serialization(path: &Path) -> impl FnOnce(serde_json::Error) -> Self + '_ {
        move |source| StorageError::Serialization {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        DomainError::Storage {
            message: err.to_string(),
        }
    }
}
