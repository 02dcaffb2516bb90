//! Main token service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::session::{Session, SessionMeta};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::SessionRepository;

use super::claims::{Claims, TokenPair};
use super::config::TokenServiceConfig;

/// SHA-256 hex digest of a token; only digests are ever persisted
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// 32 random bytes, hex encoded
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Service for issuing and verifying session-bound tokens
pub struct TokenService {
    sessions: Arc<dyn SessionRepository>,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    pub fn new(sessions: Arc<dyn SessionRepository>, config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            sessions,
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    fn refresh_lifetime(&self) -> Duration {
        Duration::seconds(self.config.refresh_token_expiry_seconds)
    }

    /// Opens a session for `user` and returns its first token pair
    pub async fn issue(&self, user: &User, meta: SessionMeta) -> Result<TokenPair, DomainError> {
        let refresh_token = generate_opaque_token();
        let session = Session::new(
            user.id,
            hash_token(&refresh_token),
            self.refresh_lifetime(),
            meta,
        );
        let session = self.sessions.create(session).await?;

        debug!(user_id = %user.id, session_id = %session.id, "Session opened");
        self.pair_for(user, &session, refresh_token)
    }

    /// Builds the token pair for an existing session
    pub fn pair_for(
        &self,
        user: &User,
        session: &Session,
        refresh_token: String,
    ) -> Result<TokenPair, DomainError> {
        let access_token = self.generate_access_token(user, session.id)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: String::from("Bearer"),
            expires_in: self.config.access_token_expiry_seconds,
            session_id: session.id,
        })
    }

    fn generate_access_token(&self, user: &User, session_id: Uuid) -> Result<String, DomainError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            sid: session_id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + self.config.access_token_expiry_seconds,
            nbf: now,
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };
        self.encode_jwt(&claims)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies signature and expiry only
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                _ => DomainError::Token(TokenError::InvalidToken),
            })?;
        Ok(token_data.claims)
    }

    /// Verifies an access token and the session it belongs to
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Token is valid and its session is active
    /// * `Err(TokenError)` - Token is invalid or expired
    /// * `Err(AuthError::SessionExpired)` - Session was revoked or has expired
    pub async fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.decode_access_token(token)?;
        let session_id = claims.session_id()?;

        match self.sessions.find_by_id(session_id).await? {
            Some(session) if session.is_active(Utc::now()) => Ok(claims),
            _ => Err(AuthError::SessionExpired.into()),
        }
    }

    /// Rotates a refresh token
    ///
    /// The presented token stops working; the returned session carries the
    /// hash of the returned replacement. Concurrent calls with the same token
    /// succeed at most once.
    pub async fn rotate(&self, refresh_token: &str) -> Result<(Session, String), DomainError> {
        let replacement = generate_opaque_token();
        let session = self
            .sessions
            .rotate_refresh_token(
                &hash_token(refresh_token),
                hash_token(&replacement),
                self.refresh_lifetime(),
                Utc::now(),
            )
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        debug!(session_id = %session.id, "Refresh token rotated");
        Ok((session, replacement))
    }

    /// Revokes one session
    pub async fn revoke(&self, session_id: Uuid) -> Result<bool, DomainError> {
        let revoked = self.sessions.invalidate(session_id).await?;
        if revoked {
            info!(session_id = %session_id, "Session revoked");
        }
        Ok(revoked)
    }

    /// Revokes every session of a user except `keep`
    pub async fn revoke_all(&self, user_id: Uuid, keep: Option<Uuid>) -> Result<usize, DomainError> {
        let count = self.sessions.invalidate_all_for_user(user_id, keep).await?;
        info!(user_id = %user_id, count, "Sessions revoked");
        Ok(count)
    }
}
