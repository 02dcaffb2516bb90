//! Rate limit counter stores

pub mod memory;
#[cfg(feature = "redis-cache")]
pub mod redis_store;

pub use memory::InMemoryRateLimitStore;
#[cfg(feature = "redis-cache")]
pub use redis_store::RedisRateLimitStore;
