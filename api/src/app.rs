//! Application factory
//!
//! Builds the actix-web [`App`] around a prepared [`AppState`]. The binary
//! and the integration tests share this factory.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};
use tracing_actix_web::TracingLogger;

use crate::handlers::error::{json_error_handler, not_found, query_error_handler};
use crate::middleware::{create_cors, SecurityHeaders};
use crate::routes::{self, system};
use crate::state::AppState;

/// Create and configure the application
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let config = &state.config;
    let cors = create_cors(
        &config.server.cors,
        config.environment,
        &config.email.frontend_url,
    );
    let json_config = web::JsonConfig::default()
        .limit(config.server.max_payload_size)
        .error_handler(json_error_handler);
    let query_config = web::QueryConfig::default().error_handler(query_error_handler);
    let security = SecurityHeaders::new(config.environment);

    App::new()
        .app_data(state.clone())
        .app_data(json_config)
        .app_data(query_config)
        // Outermost last: request span, then CORS, then security headers
        .wrap(security)
        .wrap(cors)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(system::health))
        .route("/", web::get().to(system::welcome))
        .configure(|cfg| routes::configure(cfg, &state))
        .default_service(web::route().to(not_found))
}
