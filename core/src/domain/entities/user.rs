//! User entity representing a registered account.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authorization role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular customer account
    #[default]
    User,
    /// Back-office administrator
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// User entity as persisted
///
/// Verification and reset tokens are stored as SHA-256 hashes; the raw
/// values only ever travel by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    /// Normalized (trimmed, lowercase) email address
    pub email: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,

    #[serde(default)]
    pub role: UserRole,

    #[serde(default)]
    pub is_verified: bool,

    #[serde(default)]
    pub verification_token_hash: Option<String>,

    #[serde(default)]
    pub reset_password_token_hash: Option<String>,

    #[serde(default)]
    pub reset_password_expires: Option<DateTime<Utc>>,

    /// Consecutive failed logins
    #[serde(default)]
    pub login_attempts: u32,

    /// Account is locked until this instant
    #[serde(default)]
    pub lock_until: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,

    #[serde(default)]
    pub profile_picture: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new unverified user
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: UserRole::User,
            is_verified: false,
            verification_token_hash: None,
            reset_password_token_hash: None,
            reset_password_expires: None,
            login_attempts: 0,
            lock_until: None,
            last_login: None,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the account is locked at `now`
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.map_or(false, |until| until > now)
    }

    /// Record a failed login, locking the account once `max_attempts` is reached
    ///
    /// An expired lock starts a fresh count at one. Returns `true` when this
    /// call locked the account.
    pub fn register_failed_login(
        &mut self,
        now: DateTime<Utc>,
        max_attempts: u32,
        lock_duration: Duration,
    ) -> bool {
        self.updated_at = now;

        if matches!(self.lock_until, Some(until) if until <= now) {
            self.login_attempts = 1;
            self.lock_until = None;
            return false;
        }

        self.login_attempts += 1;
        if self.login_attempts >= max_attempts && !self.is_locked(now) {
            self.lock_until = Some(now + lock_duration);
            return true;
        }
        false
    }

    /// Record a successful login
    pub fn register_successful_login(&mut self, now: DateTime<Utc>) {
        self.login_attempts = 0;
        self.lock_until = None;
        self.last_login = Some(now);
        self.updated_at = now;
    }

    /// Marks the user as verified and consumes the verification token
    pub fn verify(&mut self) {
        self.is_verified = true;
        self.verification_token_hash = None;
        self.updated_at = Utc::now();
    }

    /// Whether a stored reset token is still usable at `now`
    pub fn reset_token_valid(&self, now: DateTime<Utc>) -> bool {
        self.reset_password_token_hash.is_some()
            && self.reset_password_expires.map_or(false, |expires| expires > now)
    }

    /// Replace the password hash and clear any pending reset and lock
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.reset_password_token_hash = None;
        self.reset_password_expires = None;
        self.login_attempts = 0;
        self.lock_until = None;
        self.updated_at = Utc::now();
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Public view of the account
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// User representation returned to clients; never carries hashes or tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            is_verified: user.is_verified,
            last_login: user.last_login,
            profile_picture: user.profile_picture.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
#[path = "tests/user_tests.rs"]
mod tests;
