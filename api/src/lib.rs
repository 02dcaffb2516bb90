//! # Order Processing API
//!
//! HTTP surface of the order processing backend, built on actix-web.
//!
//! - `/api/v1/auth`, `/api/v1/users` - accounts, sessions and profiles
//! - `/api/orders`, `/api/checkout`, `/api/payments` - the order API
//! - `/health` and `/` - liveness and welcome

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::create_app;
pub use state::{AppState, Repositories};
