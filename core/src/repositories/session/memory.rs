//! In-memory implementation of SessionRepository

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::session::Session;
use crate::errors::DomainError;

use super::trait_::SessionRepository;

/// Session repository kept in process memory
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: Session) -> Result<Session, DomainError> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&id).cloned())
    }

    async fn find_by_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .find(|s| s.refresh_token_hash == token_hash)
            .cloned())
    }

    async fn rotate_refresh_token(
        &self,
        old_hash: &str,
        new_hash: String,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, DomainError> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions
            .values_mut()
            .find(|s| s.refresh_token_hash == old_hash && s.is_active(now))
        else {
            return Ok(None);
        };
        session.rotate(new_hash, lifetime);
        Ok(Some(session.clone()))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, session: Session) -> Result<Session, DomainError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session.id) {
            Some(existing) => {
                *existing = session.clone();
                Ok(session)
            }
            None => Err(DomainError::not_found("Session")),
        }
    }

    async fn invalidate(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&id) {
            Some(session) => {
                session.invalidate();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn invalidate_all_for_user(
        &self,
        user_id: Uuid,
        keep: Option<Uuid>,
    ) -> Result<usize, DomainError> {
        let mut sessions = self.sessions.write().await;
        let mut count = 0;
        for session in sessions.values_mut() {
            if session.user_id == user_id && session.is_valid && Some(session.id) != keep {
                session.invalidate();
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        Ok(before - sessions.len())
    }
}
