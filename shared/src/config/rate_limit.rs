//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Rate limiting configuration
///
/// Three buckets are tracked per client address: the general bucket
/// covering the `/api/v1` surface, a tighter bucket for credential
/// endpoints, and one for the order API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// General window in seconds (`RATE_LIMIT_WINDOW` is given in minutes)
    pub window_seconds: u64,

    /// General request budget per window
    pub max_requests: u32,

    /// Credential endpoint limits
    pub auth: EndpointLimit,

    /// Order API limits
    pub api: EndpointLimit,
}

/// A request budget over a fixed window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointLimit {
    /// Requests allowed per window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_seconds: u64,
}

impl EndpointLimit {
    pub const fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window_seconds,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            window_seconds: 15 * 60,
            max_requests: 100,
            auth: EndpointLimit::new(10, 15 * 60),
            api: EndpointLimit::new(60, 60),
        }
    }
}

impl RateLimitConfig {
    /// Rate limits disabled entirely
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

fn default_enabled() -> bool {
    true
}
