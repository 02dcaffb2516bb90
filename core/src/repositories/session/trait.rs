//! Session repository trait for login sessions and refresh token rotation.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::session::Session;
use crate::errors::DomainError;

/// Repository trait for Session persistence
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a new session, pruning sessions that have already expired
    async fn create(&self, session: Session) -> Result<Session, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError>;

    /// Find the session whose current refresh token hashes to `token_hash`
    async fn find_by_refresh_token(&self, token_hash: &str)
        -> Result<Option<Session>, DomainError>;

    /// Swap the refresh token of the active session holding `old_hash`
    ///
    /// The lookup and the swap happen as one step, so a refresh token can
    /// be exchanged at most once.
    ///
    /// # Returns
    /// * `Ok(None)` - No active session holds `old_hash`
    async fn rotate_refresh_token(
        &self,
        old_hash: &str,
        new_hash: String,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, DomainError>;

    /// All sessions of a user, valid or not
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, DomainError>;

    /// Replace a stored session
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No session with this id
    async fn update(&self, session: Session) -> Result<Session, DomainError>;

    /// Mark a session invalid; `Ok(false)` when it does not exist
    async fn invalidate(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Invalidate every valid session of a user except `keep`
    ///
    /// # Returns
    /// Number of sessions invalidated
    async fn invalidate_all_for_user(
        &self,
        user_id: Uuid,
        keep: Option<Uuid>,
    ) -> Result<usize, DomainError>;

    /// Remove sessions that expired before `now`
    ///
    /// # Returns
    /// Number of sessions removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
