//! Redis client with connection retry
//!
//! Holds one multiplexed connection that is cloned per command.

use std::time::Duration;

use redis::{aio::MultiplexedConnection, Client};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::InfrastructureError;

/// Shared Redis connection
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
}

impl RedisClient {
    /// Connect to `url`, retrying three times with backoff
    pub async fn connect(url: &str) -> Result<Self, InfrastructureError> {
        Self::connect_with_retry(url, 3, 100).await
    }

    pub async fn connect_with_retry(
        url: &str,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        info!("Creating Redis client for {}", mask_url(url));

        let client = Client::open(url).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let mut attempts = 0;
        let mut delay = retry_delay_ms;
        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(Self { connection });
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    pub fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }
}

/// Hide credentials in a Redis URL for logging
pub fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***@{}", &url[..scheme_end], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}
