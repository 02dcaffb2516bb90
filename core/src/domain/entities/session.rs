//! Login session backing an access/refresh token pair.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A login session
///
/// Access tokens carry the session id; revoking the session revokes
/// every access token minted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,

    /// SHA-256 hash of the current refresh token
    pub refresh_token_hash: String,

    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default)]
    pub ip_address: Option<String>,

    pub is_valid: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client details recorded with a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMeta {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl Session {
    pub fn new(
        user_id: Uuid,
        refresh_token_hash: String,
        lifetime: Duration,
        meta: SessionMeta,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            refresh_token_hash,
            user_agent: meta.user_agent,
            ip_address: meta.ip_address,
            is_valid: true,
            expires_at: now + lifetime,
            created_at: now,
            updated_at: now,
        }
    }

    /// Valid and not yet expired
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.is_valid && self.expires_at > now
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn invalidate(&mut self) {
        self.is_valid = false;
        self.updated_at = Utc::now();
    }

    /// Swap in a new refresh token and extend the session
    pub fn rotate(&mut self, refresh_token_hash: String, lifetime: Duration) {
        let now = Utc::now();
        self.refresh_token_hash = refresh_token_hash;
        self.expires_at = now + lifetime;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::new(
            Uuid::new_v4(),
            "hash".to_string(),
            Duration::days(7),
            SessionMeta::default(),
        );
        let now = Utc::now();
        assert!(session.is_active(now));
        assert!(!session.is_active(now + Duration::days(8)));

        session.invalidate();
        assert!(!session.is_active(now));
    }

    #[test]
    fn test_rotate_replaces_hash() {
        let mut session = Session::new(
            Uuid::new_v4(),
            "old".to_string(),
            Duration::minutes(1),
            SessionMeta::default(),
        );
        session.rotate("new".to_string(), Duration::days(7));
        assert_eq!(session.refresh_token_hash, "new");
        assert!(session.expires_at > Utc::now() + Duration::days(6));
    }
}
