//! User repository trait defining the interface for account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;
use crate::repositories::Mutation;

/// Repository trait for User entity persistence operations
///
/// Emails are stored normalized; lookups compare them verbatim.
/// Token lookups take the SHA-256 hash, never the raw token.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find the user holding a pending email verification token
    async fn find_by_verification_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, DomainError>;

    /// Find the user holding a password reset token
    ///
    /// Expiry is not checked here; callers compare `reset_password_expires`.
    async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new user
    ///
    /// # Returns
    /// * `Err(AuthError::UserAlreadyExists)` - Email already registered
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Replace a stored user
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No user with this id
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Apply `change` to a stored user atomically
    ///
    /// Used for counters such as failed logins, where concurrent
    /// read-then-update calls would lose increments.
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No user with this id
    async fn modify(&self, id: Uuid, change: Mutation<User>) -> Result<User, DomainError>;

    /// Every user, oldest first
    async fn list(&self) -> Result<Vec<User>, DomainError>;
}
