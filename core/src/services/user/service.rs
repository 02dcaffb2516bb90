use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::user::UserProfile;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::auth::{hash_password, verify_password};
use crate::services::token::TokenService;
use op_shared::validation::check_password_strength;

/// Profile fields a user may change; `None` leaves the field alone
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenService>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> DomainResult<UserProfile> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|user| user.profile())
            .ok_or(DomainError::Auth(AuthError::UserNotFound))
    }

    pub async fn update_profile(&self, user_id: Uuid, changes: UpdateProfile) -> DomainResult<UserProfile> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;

        if let Some(first_name) = changes.first_name {
            let first_name = first_name.trim();
            if first_name.is_empty() {
                return Err(DomainError::invalid("firstName", "First name cannot be empty"));
            }
            user.first_name = first_name.to_string();
        }
        if let Some(last_name) = changes.last_name {
            let last_name = last_name.trim();
            if last_name.is_empty() {
                return Err(DomainError::invalid("lastName", "Last name cannot be empty"));
            }
            user.last_name = last_name.to_string();
        }
        if let Some(picture) = changes.profile_picture {
            user.profile_picture = Some(picture).filter(|p| !p.trim().is_empty());
        }

        user.updated_at = chrono::Utc::now();
        let user = self.users.update(user).await?;
        Ok(user.profile())
    }

    /// Change the password of a logged-in user
    ///
    /// Every session except `current_session` is revoked.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_session: Option<Uuid>,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(ValidationError::invalid(
                "password",
                "Please provide current and new password",
            )
            .into());
        }

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;

        if !verify_password(current_password, &user.password_hash).await? {
            return Err(AuthError::IncorrectCurrentPassword.into());
        }

        check_password_strength(new_password).map_err(|rule| ValidationError::WeakPassword {
            reason: rule.message().to_string(),
        })?;

        user.set_password_hash(hash_password(new_password, self.bcrypt_cost).await?);
        let user = self.users.update(user).await?;

        let revoked = self.tokens.revoke_all(user.id, current_session).await?;
        info!(target: "security", event = "PASSWORD_CHANGED", user_id = %user.id, revoked, "Password changed");
        Ok(())
    }

    /// Every account, oldest first
    pub async fn list_users(&self) -> DomainResult<Vec<UserProfile>> {
        let users = self.users.list().await?;
        Ok(users.iter().map(UserProfile::from).collect())
    }
}
