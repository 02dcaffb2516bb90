//! Process-local fixed window counters

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use op_core::errors::DomainError;
use op_core::services::rate_limit::{RateLimitDecision, RateLimitPolicy, RateLimitStore};

/// Expired windows are swept once the map holds this many keys
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u64,
    resets_at: Instant,
}

/// Fixed window counters kept in process memory
///
/// Counts are per process; use the Redis store when several instances
/// share a limit.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn hit(
        &self,
        policy: &RateLimitPolicy,
        client: &str,
    ) -> Result<RateLimitDecision, DomainError> {
        let key = policy.key_for(client);
        let now = Instant::now();
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| DomainError::internal("rate limit store lock poisoned"))?;

        if windows.len() >= SWEEP_THRESHOLD {
            windows.retain(|_, window| window.resets_at > now);
        }

        let window = windows
            .entry(key)
            .and_modify(|window| {
                if window.resets_at <= now {
                    *window = Window {
                        count: 0,
                        resets_at: now + Duration::from_secs(policy.window_seconds),
                    };
                }
            })
            .or_insert_with(|| Window {
                count: 0,
                resets_at: now + Duration::from_secs(policy.window_seconds),
            });
        window.count += 1;

        let reset_after = window.resets_at.saturating_duration_since(now);
        let reset_after = reset_after.as_secs() + u64::from(reset_after.subsec_nanos() > 0);
        Ok(RateLimitDecision::from_count(
            window.count,
            policy.max_requests,
            reset_after,
        ))
    }
}
