//! CORS configuration for cross-origin requests.
//!
//! Development and test accept any origin. Other environments only accept
//! the configured origins plus the frontend URL.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use op_shared::config::{CorsConfig, Environment};
use tracing::info;

/// Headers browsers may read from responses
const EXPOSED_HEADERS: [&str; 5] = [
    "x-total-count",
    "x-ratelimit-limit",
    "x-ratelimit-remaining",
    "x-ratelimit-reset",
    "retry-after",
];

/// CORS middleware for the current environment
pub fn create_cors(config: &CorsConfig, environment: Environment, frontend_url: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(EXPOSED_HEADERS)
        .max_age(config.max_age)
        .supports_credentials();

    if environment.allows_insecure_defaults() {
        info!("Configuring permissive CORS for {}", environment);
        return cors.allow_any_origin();
    }

    // Requests from other origins never reach a handler
    let mut cors = cors.block_on_origin_mismatch(true);
    for origin in config
        .allowed_origins
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(frontend_url))
        .map(|origin| origin.trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
    {
        info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }
    cors
}
