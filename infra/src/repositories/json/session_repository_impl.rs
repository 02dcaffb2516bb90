//! JSON file implementation of the SessionRepository trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use op_core::domain::entities::session::Session;
use op_core::errors::DomainError;
use op_core::repositories::SessionRepository;

use crate::storage::{JsonStore, SESSIONS};

/// Sessions stored in `sessions.json`
pub struct JsonSessionRepository {
    store: Arc<JsonStore>,
}

impl JsonSessionRepository {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    async fn all(&self) -> Result<Vec<Session>, DomainError> {
        Ok(self.store.read(SESSIONS).await?)
    }
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
    async fn create(&self, session: Session) -> Result<Session, DomainError> {
        self.store
            .update(SESSIONS, move |sessions: &mut Vec<Session>| {
                let now = Utc::now();
                sessions.retain(|s| !s.is_expired(now));
                sessions.push(session.clone());
                Ok::<_, DomainError>(session)
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        Ok(self.all().await?.into_iter().find(|s| s.id == id))
    }

    async fn find_by_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, DomainError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .find(|s| s.refresh_token_hash == token_hash))
    }

    async fn rotate_refresh_token(
        &self,
        old_hash: &str,
        new_hash: String,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, DomainError> {
        let old_hash = old_hash.to_string();
        self.store
            .update(SESSIONS, move |sessions: &mut Vec<Session>| {
                let rotated = sessions
                    .iter_mut()
                    .find(|s| s.refresh_token_hash == old_hash && s.is_active(now))
                    .map(|session| {
                        session.rotate(new_hash, lifetime);
                        session.clone()
                    });
                Ok::<_, DomainError>(rotated)
            })
            .await
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, DomainError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|s| s.user_id == user_id)
            .collect())
    }

    async fn update(&self, session: Session) -> Result<Session, DomainError> {
        self.store
            .update(SESSIONS, move |sessions: &mut Vec<Session>| {
                match sessions.iter_mut().find(|s| s.id == session.id) {
                    Some(slot) => {
                        *slot = session.clone();
                        Ok(session)
                    }
                    None => Err(DomainError::not_found("Session")),
                }
            })
            .await
    }

    async fn invalidate(&self, id: Uuid) -> Result<bool, DomainError> {
        self.store
            .update(SESSIONS, move |sessions: &mut Vec<Session>| {
                let found = sessions.iter_mut().find(|s| s.id == id);
                let invalidated = found.is_some();
                if let Some(session) = found {
                    session.invalidate();
                }
                Ok::<_, DomainError>(invalidated)
            })
            .await
    }

    async fn invalidate_all_for_user(
        &self,
        user_id: Uuid,
        keep: Option<Uuid>,
    ) -> Result<usize, DomainError> {
        self.store
            .update(SESSIONS, move |sessions: &mut Vec<Session>| {
                let mut count = 0;
                for session in sessions
                    .iter_mut()
                    .filter(|s| s.user_id == user_id && s.is_valid && Some(s.id) != keep)
                {
                    session.invalidate();
                    count += 1;
                }
                Ok::<_, DomainError>(count)
            })
            .await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        self.store
            .update(SESSIONS, move |sessions: &mut Vec<Session>| {
                let before = sessions.len();
                sessions.retain(|s| !s.is_expired(now));
                Ok::<_, DomainError>(before - sessions.len())
            })
            .await
    }
}
