//! JSON file implementation of the UserRepository trait.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use op_core::domain::entities::user::User;
use op_core::errors::{AuthError, DomainError};
use op_core::repositories::{apply_mutation, Mutation, UserRepository};

use crate::storage::{JsonStore, USERS};

/// Users stored in `users.json`
pub struct JsonUserRepository {
    store: Arc<JsonStore>,
}

impl JsonUserRepository {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    async fn find(&self, predicate: impl Fn(&User) -> bool) -> Result<Option<User>, DomainError> {
        let users: Vec<User> = self.store.read(USERS).await?;
        Ok(users.into_iter().find(|u| predicate(u)))
    }
}

#[async_trait]
impl UserRepository for JsonUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.find(|u| u.id == id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find(|u| u.email == email).await
    }

    async fn find_by_verification_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, DomainError> {
        self.find(|u| u.verification_token_hash.as_deref() == Some(token_hash))
            .await
    }

    async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, DomainError> {
        self.find(|u| u.reset_password_token_hash.as_deref() == Some(token_hash))
            .await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        self.store
            .update(USERS, move |users: &mut Vec<User>| {
                if users.iter().any(|u| u.email == user.email) {
                    return Err(DomainError::from(AuthError::UserAlreadyExists));
                }
                users.push(user.clone());
                Ok(user)
            })
            .await
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        self.store
            .update(USERS, move |users: &mut Vec<User>| {
                match users.iter_mut().find(|u| u.id == user.id) {
                    Some(slot) => {
                        *slot = user.clone();
                        Ok(user)
                    }
                    None => Err(DomainError::not_found("User")),
                }
            })
            .await
    }

    async fn modify(&self, id: Uuid, change: Mutation<User>) -> Result<User, DomainError> {
        self.store
            .update(USERS, move |users: &mut Vec<User>| {
                let slot = users
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or_else(|| DomainError::not_found("User"))?;
                apply_mutation(slot, change)
            })
            .await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<User> = self.store.read(USERS).await?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }
}
