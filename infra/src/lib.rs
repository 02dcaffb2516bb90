//! # Infrastructure Layer
//!
//! Concrete implementations of the repository and service seams defined in
//! `op_core`.
//!
//! - **Storage**: locked, atomically rewritten JSON collection files
//! - **Repositories**: JSON-backed user, session, order, payment and checkout stores
//! - **Rate limiting**: in-memory and Redis counter stores
//! - **Email**: logging email sender
//! - **Seed**: mock orders and payments for demos
//!
//! ## Features
//!
//! - `redis-cache`: Redis client and shared rate limit counters (default)

#[cfg(feature = "redis-cache")]
pub mod cache;
pub mod email;
pub mod rate_limit;
pub mod repositories;
pub mod seed;
pub mod storage;

pub use email::LogEmailSender;
pub use rate_limit::InMemoryRateLimitStore;
#[cfg(feature = "redis-cache")]
pub use rate_limit::RedisRateLimitStore;
pub use repositories::{
    JsonCheckoutRepository, JsonOrderRepository, JsonPaymentRepository, JsonSessionRepository,
    JsonUserRepository,
};
pub use storage::{JsonStore, StorageError};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// File storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
