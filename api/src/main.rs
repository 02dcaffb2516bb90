use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use op_api::{create_app, telemetry, AppState, Repositories};
use op_core::services::rate_limit::RateLimitStore;
use op_core::services::token::{SessionCleanupConfig, SessionCleanupService};
use op_infra::{seed, InMemoryRateLimitStore, LogEmailSender};
use op_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    telemetry::init(&config.logging);

    info!(environment = ?config.environment, "Starting Order Processing API");

    let repositories = Repositories::from_config(&config)
        .await
        .context("Failed to open storage")?;

    if config.seed_mock_data {
        seed::seed_if_empty(
            repositories.orders.as_ref(),
            repositories.payments.as_ref(),
            config.seed_count,
        )
        .await
        .context("Failed to seed mock data")?;
    }

    let rate_limits = rate_limit_store(&config).await;
    let email = Arc::new(LogEmailSender::new(&config.email));

    let cleanup = Arc::new(SessionCleanupService::new(
        Arc::clone(&repositories.sessions),
        SessionCleanupConfig::default(),
    ));
    cleanup.start_background_task();

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let state = web::Data::new(AppState::new(config, &repositories, email, rate_limits));

    info!("Server listening on {}", bind_address);
    let mut server = HttpServer::new(move || create_app(state.clone()));
    // zero keeps actix's default of one worker per core
    if workers > 0 {
        server = server.workers(workers);
    }
    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server error")?;

    Ok(())
}

/// Redis-backed counters when a Redis URL is configured
///
/// Falls back to in-process counters when Redis is unreachable.
#[cfg(feature = "redis-cache")]
async fn rate_limit_store(config: &AppConfig) -> Arc<dyn RateLimitStore> {
    use op_infra::cache::RedisClient;
    use op_infra::RedisRateLimitStore;

    if let Some(url) = &config.redis_url {
        match RedisClient::connect(url).await {
            Ok(client) => {
                info!("Rate limit counters stored in Redis");
                return Arc::new(RedisRateLimitStore::new(client));
            }
            Err(e) => warn!(error = %e, "Redis unavailable, keeping rate limit counters in memory"),
        }
    }
    Arc::new(InMemoryRateLimitStore::new())
}

#[cfg(not(feature = "redis-cache"))]
async fn rate_limit_store(config: &AppConfig) -> Arc<dyn RateLimitStore> {
    if config.redis_url.is_some() {
        warn!("Built without redis-cache; REDIS_URL is ignored");
    }
    Arc::new(InMemoryRateLimitStore::new())
}
