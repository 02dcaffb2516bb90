//! Configuration for the authentication service

use op_shared::config::{AuthConfig, EmailConfig};

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Failed logins before the account is locked
    pub max_login_attempts: u32,
    /// Account lock duration in seconds
    pub lock_duration_seconds: i64,
    /// Password reset token lifetime in seconds
    pub reset_token_expiry_seconds: i64,
    /// Base URL used in verification and reset links
    pub frontend_url: String,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default(), &EmailConfig::default())
    }
}

impl AuthServiceConfig {
    pub fn from_config(auth: &AuthConfig, email: &EmailConfig) -> Self {
        Self {
            bcrypt_cost: auth.bcrypt_cost,
            max_login_attempts: auth.max_login_attempts,
            lock_duration_seconds: auth.lock_duration_seconds,
            reset_token_expiry_seconds: auth.reset_token_expiry,
            frontend_url: email.frontend_url.clone(),
        }
    }
}
