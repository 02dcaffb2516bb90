//! Hardened JSON file storage
//!
//! - One JSON array file per collection
//! - Lock files with stale lock detection
//! - Atomic replace through temp files and backups

mod error;
mod json_store;
mod lock;

#[cfg(test)]
mod tests;

pub use error::StorageError;
pub use json_store::JsonStore;
pub use lock::{FileLock, LockInfo, LockSettings};

pub const USERS: &str = "users";
pub const SESSIONS: &str = "sessions";
pub const ORDERS: &str = "orders";
pub const PAYMENTS: &str = "payments";
pub const CHECKOUT_SESSIONS: &str = "checkout_sessions";

/// Collections created by [`JsonStore::open`]
pub const COLLECTIONS: [&str; 5] = [USERS, SESSIONS, ORDERS, PAYMENTS, CHECKOUT_SESSIONS];
