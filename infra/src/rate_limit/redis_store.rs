//! Redis-backed fixed window counters shared between instances

use async_trait::async_trait;
use tracing::error;

use op_core::errors::DomainError;
use op_core::services::rate_limit::{RateLimitDecision, RateLimitPolicy, RateLimitStore};

use crate::cache::RedisClient;

/// Counters stored as Redis keys that expire with their window
pub struct RedisRateLimitStore {
    client: RedisClient,
}

impl RedisRateLimitStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

fn cache_error(action: &str, e: redis::RedisError) -> DomainError {
    error!("Rate limit {} failed: {}", action, e);
    DomainError::internal(format!("Failed to {} rate limit counter: {}", action, e))
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn hit(
        &self,
        policy: &RateLimitPolicy,
        client: &str,
    ) -> Result<RateLimitDecision, DomainError> {
        let key = policy.key_for(client);
        let mut conn = self.client.connection();

        let count: u64 = redis::cmd("INCR")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| cache_error("increment", e))?;

        if count == 1 {
            let _: () = redis::cmd("EXPIRE")
                .arg(&key)
                .arg(policy.window_seconds)
                .query_async(&mut conn)
                .await
                .map_err(|e| cache_error("expire", e))?;
        }

        let ttl: i64 = redis::cmd("TTL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| cache_error("read ttl of", e))?;

        // -1 means the expiry was lost; restore it
        if ttl == -1 {
            let _: () = redis::cmd("EXPIRE")
                .arg(&key)
                .arg(policy.window_seconds)
                .query_async(&mut conn)
                .await
                .map_err(|e| cache_error("expire", e))?;
        }

        let reset_after = if ttl > 0 {
            ttl as u64
        } else {
            policy.window_seconds
        };
        Ok(RateLimitDecision::from_count(
            count,
            policy.max_requests,
            reset_after,
        ))
    }
}
