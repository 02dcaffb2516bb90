//! Tests for lock files

use std::time::Duration;

use tempfile::TempDir;

use crate::storage::{FileLock, LockInfo, LockSettings, StorageError};

fn settings(stale_after: Duration) -> LockSettings {
    LockSettings {
        stale_after,
        max_retries: 2,
        retry_delay: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn test_lock_records_owner_and_releases_on_drop() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.json.lock");

    let lock = FileLock::acquire(path.clone(), settings(Duration::from_secs(5)))
        .await
        .unwrap();
    let info: LockInfo = serde_json::from_slice(&std::fs::read(lock.path()).unwrap()).unwrap();
    assert_eq!(info.pid, std::process::id());

    drop(lock);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_held_lock_times_out() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.json.lock");
    let _held = FileLock::acquire(path.clone(), settings(Duration::from_secs(60)))
        .await
        .unwrap();

    let err = FileLock::acquire(path.clone(), settings(Duration::from_secs(60)))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::LockTimeout { .. }));
}

#[tokio::test]
async fn test_stale_lock_is_taken_over() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.json.lock");
    std::fs::write(&path, "{\"pid\":1,\"acquiredAt\":\"2020-01-01T00:00:00Z\"}").unwrap();

    let lock = FileLock::acquire(path.clone(), settings(Duration::ZERO))
        .await
        .unwrap();
    let info: LockInfo = serde_json::from_slice(&std::fs::read(lock.path()).unwrap()).unwrap();
    assert_eq!(info.pid, std::process::id());
}

#[tokio::test]
async fn test_taken_over_lock_is_not_released_by_old_holder() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.json.lock");

    let slow = FileLock::acquire(path.clone(), settings(Duration::from_millis(50)))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let current = FileLock::acquire(path.clone(), settings(Duration::from_millis(50)))
        .await
        .unwrap();
    assert_ne!(slow.token(), current.token());

    drop(slow);
    assert!(path.exists());
    let info: LockInfo = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(info.token, current.token());

    let err = FileLock::acquire(path.clone(), settings(Duration::from_secs(60)))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::LockTimeout { .. }));

    drop(current);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_staleness_follows_recorded_acquire_time() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.json.lock");
    // Fresh mtime, but the holder recorded an old acquire time
    std::fs::write(
        &path,
        "{\"pid\":1,\"token\":\"old\",\"acquiredAt\":\"2020-01-01T00:00:00Z\"}",
    )
    .unwrap();

    let lock = FileLock::acquire(path.clone(), settings(Duration::from_secs(60)))
        .await
        .unwrap();
    assert_ne!(lock.token(), "old");
}

#[tokio::test]
async fn test_recent_acquire_time_keeps_lock_active() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.json.lock");
    let info = LockInfo {
        pid: 1,
        token: "holder".to_string(),
        acquired_at: chrono::Utc::now(),
    };
    std::fs::write(&path, serde_json::to_vec(&info).unwrap()).unwrap();

    let err = FileLock::acquire(path.clone(), settings(Duration::from_secs(60)))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::LockTimeout { .. }));
}
