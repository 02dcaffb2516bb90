//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};

/// Secret used when none is configured outside production
pub const DEVELOPMENT_JWT_SECRET: &str = "development-secret-change-me";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEVELOPMENT_JWT_SECRET),
            access_token_expiry: 86_400,   // 1 day
            refresh_token_expiry: 604_800, // 7 days
            issuer: String::from("order-processing"),
            audience: String::from("order-processing-api"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Check if using the development secret
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEVELOPMENT_JWT_SECRET
    }
}

/// Account security configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT settings
    pub jwt: JwtConfig,

    /// bcrypt work factor
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Failed logins before the account is locked
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,

    /// Lock duration in seconds
    #[serde(default = "default_lock_duration")]
    pub lock_duration_seconds: i64,

    /// Email verification token lifetime in seconds
    #[serde(default = "default_verification_expiry")]
    pub verification_token_expiry: i64,

    /// Password reset token lifetime in seconds
    #[serde(default = "default_reset_expiry")]
    pub reset_token_expiry: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            bcrypt_cost: default_bcrypt_cost(),
            max_login_attempts: default_max_login_attempts(),
            lock_duration_seconds: default_lock_duration(),
            verification_token_expiry: default_verification_expiry(),
            reset_token_expiry: default_reset_expiry(),
        }
    }
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_max_login_attempts() -> u32 {
    5
}

fn default_lock_duration() -> i64 {
    3600
}

fn default_verification_expiry() -> i64 {
    86_400
}

fn default_reset_expiry() -> i64 {
    3600
}
