//! Session cleanup service for periodic removal of expired sessions

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::SessionRepository;

/// Configuration for session cleanup service
#[derive(Debug, Clone)]
pub struct SessionCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for SessionCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

/// Outcome of one cleanup cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupResult {
    pub expired_sessions_deleted: usize,
    pub errors: Vec<String>,
}

/// Service for deleting expired sessions
pub struct SessionCleanupService {
    repository: Arc<dyn SessionRepository>,
    config: SessionCleanupConfig,
}

impl SessionCleanupService {
    pub fn new(repository: Arc<dyn SessionRepository>, config: SessionCleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single cleanup cycle
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let mut result = CleanupResult::default();
        match self.repository.delete_expired(Utc::now()).await {
            Ok(count) => {
                result.expired_sessions_deleted = count;
                info!("Deleted {} expired sessions", count);
            }
            Err(e) => {
                error!("Failed to cleanup expired sessions: {}", e);
                result.errors.push(format!("Session cleanup error: {}", e));
            }
        }

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// The first cycle runs one full interval after start.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Session cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        tokio::spawn(async move {
            info!(
                "Starting session cleanup background task (interval: {:?})",
                interval
            );
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_cleanup().await {
                    error!("Session cleanup cycle failed: {}", e);
                }
            }
        });
    }
}
