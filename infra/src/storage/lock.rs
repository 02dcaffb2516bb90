//! Cross-process lock files

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::StorageError;

/// Contents of a lock file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockInfo {
    pub pid: u32,
    /// Identifies the holder; only the holder with this token may release
    #[serde(default)]
    pub token: String,
    pub acquired_at: DateTime<Utc>,
}

impl LockInfo {
    fn age(&self) -> Duration {
        (Utc::now() - self.acquired_at).to_std().unwrap_or_default()
    }
}

/// Timing for lock acquisition
#[derive(Debug, Clone, Copy)]
pub struct LockSettings {
    /// Age after which an existing lock is treated as abandoned
    pub stale_after: Duration,
    pub max_retries: u32,
    /// Delay before the first retry; doubles every retry
    pub retry_delay: Duration,
}

/// Held lock file, removed on drop while still owned
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    token: String,
}

enum Holder {
    Active,
    /// Abandoned lock, with the token it was written with
    Stale(Option<String>),
    Gone,
}

fn parse_info(bytes: &[u8]) -> Option<LockInfo> {
    serde_json::from_slice(bytes).ok()
}

/// Age of a lock file whose contents are not readable yet
async fn age_from_mtime(path: &Path) -> Result<Option<Duration>, StorageError> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path)(e)),
    };
    let modified = metadata.modified().map_err(StorageError::io(path))?;
    Ok(Some(
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default(),
    ))
}

async fn inspect(path: &Path, stale_after: Duration) -> Result<Holder, StorageError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Holder::Gone),
        Err(e) => return Err(StorageError::io(path)(e)),
    };

    let (age, token) = match parse_info(&bytes) {
        Some(info) => (info.age(), Some(info.token)),
        // Holder created the file but has not written its info yet
        None => match age_from_mtime(path).await? {
            Some(age) => (age, None),
            None => return Ok(Holder::Gone),
        },
    };

    Ok(if age >= stale_after {
        Holder::Stale(token)
    } else {
        Holder::Active
    })
}

/// Remove an abandoned lock unless another process replaced it meanwhile
async fn remove_stale(path: &Path, token: Option<String>) -> Result<(), StorageError> {
    if let Some(expected) = token {
        let current = match tokio::fs::read(path).await {
            Ok(bytes) => parse_info(&bytes).map(|info| info.token),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StorageError::io(path)(e)),
        };
        if current.as_deref() != Some(expected.as_str()) {
            return Ok(());
        }
    }
    remove_if_exists(path).await
}

impl FileLock {
    /// Create `path` exclusively, waiting for the current holder if needed
    pub async fn acquire(path: PathBuf, settings: LockSettings) -> Result<Self, StorageError> {
        let mut attempt: u32 = 0;
        loop {
            let created = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match created {
                Ok(mut file) => {
                    let info = LockInfo {
                        pid: std::process::id(),
                        token: Uuid::new_v4().to_string(),
                        acquired_at: Utc::now(),
                    };
                    let lock = FileLock {
                        path,
                        token: info.token.clone(),
                    };
                    let bytes = serde_json::to_vec(&info)
                        .map_err(StorageError::serialization(&lock.path))?;
                    file.write_all(&bytes)
                        .await
                        .map_err(StorageError::io(&lock.path))?;
                    file.flush().await.map_err(StorageError::io(&lock.path))?;
                    debug!(path = %lock.path.display(), "Lock acquired");
                    return Ok(lock);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    match inspect(&path, settings.stale_after).await? {
                        Holder::Gone => continue,
                        Holder::Stale(token) => {
                            warn!(path = %path.display(), "Removing stale lock file");
                            remove_stale(&path, token).await?;
                            continue;
                        }
                        Holder::Active => {}
                    }

                    if attempt >= settings.max_retries {
                        return Err(StorageError::LockTimeout { path });
                    }
                    let delay = settings.retry_delay.saturating_mul(2u32.saturating_pow(attempt));
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(StorageError::io(&path)(e)),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether the file on disk still carries this holder's token
    fn still_owned(&self) -> bool {
        std::fs::read(&self.path)
            .ok()
            .and_then(|bytes| parse_info(&bytes))
            .is_some_and(|info| info.token == self.token)
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if !self.still_owned() {
            warn!(path = %self.path.display(), "Lock was taken over, leaving it in place");
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to release lock file"),
        }
    }
}

/// Remove a file, treating an already missing file as success
pub(crate) async fn remove_if_exists(path: &Path) -> Result<(), StorageError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StorageError::io(path)(e)),
    }
}

/// Remove a scratch path whatever it is, file or directory
pub(crate) async fn remove_scratch(path: &Path) -> Result<(), StorageError> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) if metadata.is_dir() => tokio::fs::remove_dir_all(path)
            .await
            .map_err(StorageError::io(path)),
        Ok(_) => remove_if_exists(path).await,
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StorageError::io(path)(e)),
    }
}
