//! HTTP route handlers
//!
//! - `system` - health, welcome and endpoint index
//! - `auth`, `users` - account endpoints under `/api/v1`
//! - `orders`, `checkout`, `payments` - order API under `/api`

pub mod auth;
pub mod checkout;
pub mod orders;
pub mod payments;
pub mod system;
pub mod users;

use actix_web::{web, HttpRequest};
use op_core::errors::DomainError;
use op_core::services::rate_limit::RateLimitPolicy;
use op_core::SessionMeta;
use uuid::Uuid;

use crate::handlers::ApiError;
use crate::middleware::rate_limit::{RateLimit, AUTH_MESSAGE};
use crate::middleware::{JwtAuth, RequireRole};
use crate::state::AppState;

/// Register every route under `/api/v1` and `/api`
///
/// `/api/v1` must be registered first so the `/api` scope does not
/// swallow it.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    let limits = &state.config.rate_limit;
    let general = RateLimit::new(
        state.rate_limits.clone(),
        RateLimitPolicy::new("global", limits.max_requests, limits.window_seconds),
    )
    .enabled(limits.enabled);
    let credentials = RateLimit::new(
        state.rate_limits.clone(),
        RateLimitPolicy::from_limit("auth", limits.auth),
    )
    .with_message(AUTH_MESSAGE)
    .enabled(limits.enabled);
    let api = RateLimit::new(
        state.rate_limits.clone(),
        RateLimitPolicy::from_limit("api", limits.api),
    )
    .enabled(limits.enabled);

    cfg.service(
        web::scope("/api/v1")
            .wrap(general)
            .route("", web::get().to(system::api_index))
            .service(
                web::scope("/auth")
                    .service(
                        web::resource("/register")
                            .wrap(credentials.clone())
                            .route(web::post().to(auth::register)),
                    )
                    .service(
                        web::resource("/login")
                            .wrap(credentials.clone())
                            .route(web::post().to(auth::login)),
                    )
                    .route("/verify-email/{token}", web::get().to(auth::verify_email))
                    .service(
                        web::resource("/request-password-reset")
                            .wrap(credentials.clone())
                            .route(web::post().to(auth::request_password_reset)),
                    )
                    .service(
                        web::resource("/reset-password")
                            .wrap(credentials)
                            .route(web::post().to(auth::reset_password)),
                    )
                    .route("/refresh", web::post().to(auth::refresh))
                    .service(
                        web::resource("/logout")
                            .wrap(JwtAuth::new())
                            .route(web::post().to(auth::logout)),
                    ),
            )
            .service(
                web::scope("/users")
                    .service(
                        web::resource("")
                            .wrap(RequireRole::admin())
                            .wrap(JwtAuth::new())
                            .route(web::get().to(users::list_users)),
                    )
                    .service(
                        web::resource("/profile")
                            .wrap(JwtAuth::new())
                            .route(web::get().to(users::get_profile))
                            .route(web::put().to(users::update_profile)),
                    )
                    .service(
                        web::resource("/change-password")
                            .wrap(JwtAuth::new())
                            .route(web::post().to(users::change_password)),
                    ),
            ),
    );

    cfg.service(
        web::scope("/api")
            .wrap(api)
            .route("/status", web::get().to(system::api_status))
            .service(
                web::scope("/orders")
                    .route("/status", web::get().to(orders::service_status))
                    .route("", web::get().to(orders::list_orders))
                    .route("", web::post().to(orders::create_order))
                    .route("/{id}", web::get().to(orders::get_order))
                    .route("/{id}", web::delete().to(orders::delete_order))
                    .route("/{id}/status", web::put().to(orders::update_status)),
            )
            .service(
                web::scope("/checkout")
                    .route("/initialize", web::post().to(checkout::initialize))
                    .route("/process", web::post().to(checkout::process))
                    .route("/shipping-cost", web::post().to(checkout::shipping_cost))
                    .route("/tax", web::post().to(checkout::tax))
                    .route("/{id}", web::get().to(checkout::get_checkout)),
            )
            .service(
                web::scope("/payments")
                    .route("/process", web::post().to(payments::process))
                    .route("/order/{order_id}", web::get().to(payments::get_by_order))
                    .route("/{id}", web::get().to(payments::get_payment))
                    .route("/{id}/refund", web::post().to(payments::refund)),
            ),
    );
}

/// Client details recorded with a new session
pub(crate) fn session_meta(req: &HttpRequest) -> SessionMeta {
    let user_agent = req
        .headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let ip_address = req.connection_info().realip_remote_addr().map(str::to_string);

    SessionMeta {
        user_agent,
        ip_address,
    }
}

/// Path ids that are not UUIDs cannot name an existing resource
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::api(DomainError::not_found(resource)))
}
