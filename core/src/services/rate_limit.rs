//! Fixed-window request rate limiting

use async_trait::async_trait;
use op_shared::config::EndpointLimit;

use crate::errors::DomainError;

/// A request budget for one class of endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Counter namespace, e.g. `auth`
    pub key_prefix: String,
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl RateLimitPolicy {
    pub fn new(key_prefix: impl Into<String>, max_requests: u32, window_seconds: u64) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            max_requests,
            window_seconds,
        }
    }

    pub fn from_limit(key_prefix: impl Into<String>, limit: EndpointLimit) -> Self {
        Self::new(key_prefix, limit.max_requests, limit.window_seconds)
    }

    /// Login, registration and password reset: 10 requests per 15 minutes
    pub fn auth() -> Self {
        Self::new("auth", 10, 15 * 60)
    }

    /// Order API: 60 requests per minute
    pub fn api() -> Self {
        Self::new("api", 60, 60)
    }

    /// Counter key for a client
    pub fn key_for(&self, client: &str) -> String {
        format!("rate_limit:{}:{}", self.key_prefix, client)
    }
}

/// Result of counting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the window resets
    pub reset_after_seconds: u64,
}

impl RateLimitDecision {
    /// Decision for the `count`-th request of a window
    pub fn from_count(count: u64, limit: u32, reset_after_seconds: u64) -> Self {
        Self {
            allowed: count <= u64::from(limit),
            limit,
            remaining: u64::from(limit).saturating_sub(count) as u32,
            reset_after_seconds,
        }
    }
}

/// Counter backend for rate limiting
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one request for `client` under `policy`
    async fn hit(
        &self,
        policy: &RateLimitPolicy,
        client: &str,
    ) -> Result<RateLimitDecision, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_from_count() {
        let first = RateLimitDecision::from_count(1, 10, 900);
        assert!(first.allowed);
        assert_eq!(first.remaining, 9);

        let last = RateLimitDecision::from_count(10, 10, 5);
        assert!(last.allowed);
        assert_eq!(last.remaining, 0);

        let over = RateLimitDecision::from_count(11, 10, 5);
        assert!(!over.allowed);
        assert_eq!(over.remaining, 0);
    }

    #[test]
    fn test_presets() {
        assert_eq!(RateLimitPolicy::auth().max_requests, 10);
        assert_eq!(RateLimitPolicy::auth().window_seconds, 900);
        assert_eq!(RateLimitPolicy::api().window_seconds, 60);
        assert_eq!(
            RateLimitPolicy::api().key_for("10.0.0.1"),
            "rate_limit:api:10.0.0.1"
        );
    }
}
