//! Application state shared by every handler
//!
//! Repositories are chosen by the configured storage backend; services are
//! built once and cloned into each worker behind `Arc`.

use std::sync::Arc;

use op_core::repositories::{
    CheckoutRepository, InMemoryCheckoutRepository, InMemoryOrderRepository,
    InMemoryPaymentRepository, InMemorySessionRepository, InMemoryUserRepository,
    OrderRepository, PaymentRepository, SessionRepository, UserRepository,
};
use op_core::services::auth::{AuthService, AuthServiceConfig};
use op_core::services::checkout::CheckoutService;
use op_core::services::email::EmailSender;
use op_core::services::orders::OrderService;
use op_core::services::payments::PaymentService;
use op_core::services::rate_limit::RateLimitStore;
use op_core::services::token::{TokenService, TokenServiceConfig};
use op_core::services::user::UserService;
use op_infra::repositories::{
    JsonCheckoutRepository, JsonOrderRepository, JsonPaymentRepository, JsonSessionRepository,
    JsonUserRepository,
};
use op_infra::storage::JsonStore;
use op_infra::{InMemoryRateLimitStore, InfrastructureError, LogEmailSender};
use op_shared::config::{AppConfig, StorageBackend};
use tracing::info;

/// One implementation of every repository trait
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub checkouts: Arc<dyn CheckoutRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            sessions: Arc::new(InMemorySessionRepository::new()),
            orders: Arc::new(InMemoryOrderRepository::new()),
            payments: Arc::new(InMemoryPaymentRepository::new()),
            checkouts: Arc::new(InMemoryCheckoutRepository::new()),
        }
    }

    pub fn json(store: Arc<JsonStore>) -> Self {
        Self {
            users: Arc::new(JsonUserRepository::new(Arc::clone(&store))),
            sessions: Arc::new(JsonSessionRepository::new(Arc::clone(&store))),
            orders: Arc::new(JsonOrderRepository::new(Arc::clone(&store))),
            payments: Arc::new(JsonPaymentRepository::new(Arc::clone(&store))),
            checkouts: Arc::new(JsonCheckoutRepository::new(store)),
        }
    }

    /// Repositories for the configured backend
    ///
    /// Opening the JSON store recovers interrupted writes and fails when a
    /// collection file is corrupt with no backup to restore.
    pub async fn from_config(config: &AppConfig) -> Result<Self, InfrastructureError> {
        match config.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageBackend::Json => {
                let store = JsonStore::open(&config.storage).await?;
                info!(path = %store.root().display(), "Using JSON file storage");
                Ok(Self::json(Arc::new(store)))
            }
        }
    }
}

/// Services and settings available to handlers and middleware
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub tokens: Arc<TokenService>,
    pub orders: Arc<OrderService>,
    pub checkout: Arc<CheckoutService>,
    pub payments: Arc<PaymentService>,
    pub rate_limits: Arc<dyn RateLimitStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        repositories: &Repositories,
        email: Arc<dyn EmailSender>,
        rate_limits: Arc<dyn RateLimitStore>,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(
            Arc::clone(&repositories.sessions),
            TokenServiceConfig::from(&config.auth.jwt),
        ));
        let auth = Arc::new(AuthService::new(
            Arc::clone(&repositories.users),
            Arc::clone(&tokens),
            email,
            AuthServiceConfig::from_config(&config.auth, &config.email),
        ));
        let users = Arc::new(UserService::new(
            Arc::clone(&repositories.users),
            Arc::clone(&tokens),
            config.auth.bcrypt_cost,
        ));
        let orders = Arc::new(OrderService::new(Arc::clone(&repositories.orders)));
        let checkout = Arc::new(CheckoutService::new(
            Arc::clone(&repositories.checkouts),
            Arc::clone(&orders),
        ));
        let payments = Arc::new(PaymentService::new(
            Arc::clone(&repositories.payments),
            Arc::clone(&repositories.orders),
        ));

        Self {
            config: Arc::new(config),
            auth,
            users,
            tokens,
            orders,
            checkout,
            payments,
            rate_limits,
        }
    }

    /// Fully in-memory state with a logging email sender
    pub fn in_memory(config: AppConfig) -> Self {
        let email = Arc::new(LogEmailSender::new(&config.email));
        Self::new(
            config,
            &Repositories::in_memory(),
            email,
            Arc::new(InMemoryRateLimitStore::new()),
        )
    }
}
