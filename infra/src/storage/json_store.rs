//! JSON file store with crash recovery
//!
//! Each collection is a JSON array in `<name>.json`. Writes go through
//! `<name>.json.tmp` and are renamed into place, with the previous file
//! kept as `<name>.json.bak` until the rename succeeds. Readers and writers
//! hold `<name>.json.lock`, so several processes can share a data directory.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use op_shared::config::StorageConfig;

use super::error::StorageError;
use super::lock::{remove_if_exists, remove_scratch, FileLock, LockSettings};
use super::COLLECTIONS;

/// File names belonging to one collection
#[derive(Debug, Clone)]
struct CollectionFiles {
    data: PathBuf,
    backup: PathBuf,
    temp: PathBuf,
    lock: PathBuf,
}

impl CollectionFiles {
    fn new(root: &Path, name: &str) -> Self {
        let data = root.join(format!("{}.json", name));
        let with_suffix = |suffix: &str| root.join(format!("{}.json.{}", name, suffix));
        Self {
            backup: with_suffix("bak"),
            temp: with_suffix("tmp"),
            lock: with_suffix("lock"),
            data,
        }
    }

    /// Where a corrupt backup is moved so it is kept for inspection
    fn quarantine(&self) -> PathBuf {
        let mut name = self.backup.clone().into_os_string();
        name.push(format!(".corrupt-{}", chrono::Utc::now().timestamp_millis()));
        PathBuf::from(name)
    }
}

struct Collection {
    files: CollectionFiles,
    guard: Arc<Mutex<()>>,
}

/// Collection store over a data directory
pub struct JsonStore {
    root: PathBuf,
    lock_settings: LockSettings,
    collections: HashMap<String, Collection>,
}

async fn exists(path: &Path) -> Result<bool, StorageError> {
    tokio::fs::try_exists(path).await.map_err(StorageError::io(path))
}

/// Whether `path` holds a readable JSON array; `None` when missing
async fn check_array(path: &Path) -> Result<Option<bool>, StorageError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(
            serde_json::from_slice::<Vec<serde_json::Value>>(&bytes).is_ok(),
        )),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::io(path)(e)),
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(StorageError::io(path))?;
    file.write_all(bytes).await.map_err(StorageError::io(path))?;
    file.sync_all().await.map_err(StorageError::io(path))?;
    Ok(())
}

impl JsonStore {
    /// Open a store holding every application collection
    pub async fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::open_with(config, &COLLECTIONS).await
    }

    /// Open a store holding the named collections
    ///
    /// Interrupted writes from a previous run are rolled back or cleaned up
    /// before the store is returned.
    pub async fn open_with(config: &StorageConfig, names: &[&str]) -> Result<Self, StorageError> {
        let root = config.data_dir.clone();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(StorageError::io(&root))?;

        let mut collections = HashMap::new();
        for name in names {
            let files = CollectionFiles::new(&root, name);
            Self::recover(name, &files).await?;
            collections.insert(
                name.to_string(),
                Collection {
                    files,
                    guard: Arc::new(Mutex::new(())),
                },
            );
        }

        info!(root = %root.display(), collections = names.len(), "JSON store opened");
        Ok(Self {
            root,
            lock_settings: LockSettings {
                stale_after: Duration::from_millis(config.lock_timeout_ms),
                max_retries: config.max_retries,
                retry_delay: Duration::from_millis(config.retry_delay_ms),
            },
            collections,
        })
    }

    async fn recover(name: &str, files: &CollectionFiles) -> Result<(), StorageError> {
        let data_state = check_array(&files.data).await?;
        let data_ok = data_state == Some(true);
        let backup_state = check_array(&files.backup).await?;

        if data_state.is_none() && backup_state == Some(false) {
            let quarantine = files.quarantine();
            warn!(
                collection = name,
                path = %files.backup.display(),
                moved_to = %quarantine.display(),
                "Backup is corrupt, moving it aside"
            );
            tokio::fs::rename(&files.backup, &quarantine)
                .await
                .map_err(StorageError::io(&files.backup))?;
        } else if !data_ok && backup_state == Some(true) {
            warn!(collection = name, "Restoring collection from backup");
            tokio::fs::copy(&files.backup, &files.data)
                .await
                .map_err(StorageError::io(&files.data))?;
            remove_if_exists(&files.backup).await?;
        } else if data_ok && exists(&files.backup).await? {
            debug!(collection = name, "Removing leftover backup");
            remove_if_exists(&files.backup).await?;
        } else if data_state == Some(false) {
            error!(collection = name, path = %files.data.display(), "Collection file is corrupt and has no backup");
            let bytes = tokio::fs::read(&files.data)
                .await
                .map_err(StorageError::io(&files.data))?;
            serde_json::from_slice::<Vec<serde_json::Value>>(&bytes)
                .map_err(StorageError::serialization(&files.data))?;
        }

        remove_scratch(&files.temp).await?;

        if !exists(&files.data).await? {
            write_synced(&files.data, b"[]").await?;
            debug!(collection = name, "Initialized empty collection");
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection(&self, name: &str) -> Result<&Collection, StorageError> {
        self.collections
            .get(name)
            .ok_or_else(|| StorageError::UnknownCollection(name.to_string()))
    }

    async fn load<T: DeserializeOwned>(files: &CollectionFiles) -> Result<Vec<T>, StorageError> {
        match tokio::fs::read(&files.data).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(StorageError::serialization(&files.data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::io(&files.data)(e)),
        }
    }

    /// Every record of a collection
    pub async fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, StorageError> {
        let collection = self.collection(name)?;
        let _guard = collection.guard.lock().await;
        let _lock = FileLock::acquire(collection.files.lock.clone(), self.lock_settings).await?;
        Self::load(&collection.files).await
    }

    /// Read-modify-write a collection
    ///
    /// `f` runs while the collection is locked. Its changes are committed
    /// only when it returns `Ok`.
    pub async fn update<T, R, E, F>(&self, name: &str, f: F) -> Result<R, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StorageError>,
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
    {
        let collection = self.collection(name)?;
        let _guard = collection.guard.lock().await;
        let _lock = FileLock::acquire(collection.files.lock.clone(), self.lock_settings).await?;

        let mut records = Self::load::<T>(&collection.files).await?;
        let outcome = f(&mut records)?;
        Self::commit(&collection.files, &records).await?;
        Ok(outcome)
    }

    async fn commit<T: Serialize>(files: &CollectionFiles, records: &[T]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(records).map_err(StorageError::serialization(&files.data))?;

        let had_data = exists(&files.data).await?;
        if had_data {
            tokio::fs::copy(&files.data, &files.backup)
                .await
                .map_err(StorageError::io(&files.backup))?;
        }

        let written = async {
            write_synced(&files.temp, &bytes).await?;
            tokio::fs::rename(&files.temp, &files.data)
                .await
                .map_err(StorageError::io(&files.data))
        }
        .await;

        match written {
            Ok(()) => remove_if_exists(&files.backup).await,
            Err(e) => {
                error!(path = %files.data.display(), error = %e, "Write failed, restoring backup");
                if had_data {
                    if let Err(restore) = tokio::fs::copy(&files.backup, &files.data).await {
                        error!(error = %restore, "Backup restore failed");
                    } else {
                        let _ = remove_if_exists(&files.backup).await;
                    }
                }
                if let Err(cleanup) = remove_scratch(&files.temp).await {
                    warn!(error = %cleanup, "Temp file cleanup failed");
                }
                Err(e)
            }
        }
    }
}
