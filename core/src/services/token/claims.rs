//! JWT claims and the token pair handed to clients

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::user::UserRole;
use crate::errors::{DomainError, TokenError};

/// Access token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Session id
    pub sid: String,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, DomainError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::InvalidToken.into())
    }

    pub fn session_id(&self) -> Result<Uuid, DomainError> {
        Uuid::parse_str(&self.sid).map_err(|_| TokenError::InvalidToken.into())
    }
}

/// Tokens returned after login, registration and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    #[serde(skip)]
    pub session_id: Uuid,
}
