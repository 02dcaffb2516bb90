//! Mapping of domain errors to HTTP responses
//!
//! Two body shapes are in use. The account endpoints under `/api/v1` answer
//! `{ "success": false, "message": ..., "errors"?: [...] }`; the order,
//! checkout and payment endpoints answer with an [`ApiErrorBody`].

use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use op_core::errors::{
    AuthError, DomainError, OrderError, PaymentError, TokenError, ValidationError,
};
use op_shared::types::ApiErrorBody;
use serde_json::{json, Value};
use tracing::{error, warn};

/// Message sent in place of internal error details
const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Which response shape an error is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFamily {
    /// `{ success, message, errors? }`
    Account,
    /// `{ error: { code, message, status, timestamp, details? } }`
    Api,
}

impl ErrorFamily {
    /// Family of the endpoint serving `path`
    pub fn for_path(path: &str) -> Self {
        if path.starts_with("/api/") && !path.starts_with("/api/v1") {
            ErrorFamily::Api
        } else {
            ErrorFamily::Account
        }
    }
}

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        DomainError::Storage { .. } | DomainError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        DomainError::Auth(auth) => match auth {
            AuthError::UserAlreadyExists
            | AuthError::InvalidVerificationToken
            | AuthError::InvalidResetToken => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::AccountLocked
            | AuthError::Unauthorized
            | AuthError::IncorrectCurrentPassword
            | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailDeliveryFailed => StatusCode::INTERNAL_SERVER_ERROR,
        },
        DomainError::Token(TokenError::TokenGenerationFailed) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Token(_) => StatusCode::UNAUTHORIZED,
        DomainError::ValidationErr(_) => StatusCode::BAD_REQUEST,
        DomainError::Order(OrderError::InvalidStatus { .. }) => StatusCode::BAD_REQUEST,
        DomainError::Order(_) => StatusCode::CONFLICT,
        DomainError::Payment(PaymentError::AlreadyRefunded) => StatusCode::CONFLICT,
        DomainError::Payment(_) => StatusCode::BAD_REQUEST,
    }
}

/// Machine readable code for the order API body
pub fn code_for(error: &DomainError) -> &'static str {
    match error {
        DomainError::NotFound { .. } | DomainError::Auth(AuthError::UserNotFound) => "NOT_FOUND",
        DomainError::RateLimited { .. } => "RATE_LIMITED",
        DomainError::ValidationErr(_) => "VALIDATION_ERROR",
        DomainError::Order(OrderError::InvalidStatus { .. }) => "INVALID_STATUS",
        DomainError::Order(OrderError::InvalidTransition { .. }) => "INVALID_TRANSITION",
        DomainError::Order(OrderError::NotDeletable { .. }) => "ORDER_NOT_DELETABLE",
        DomainError::Payment(PaymentError::AlreadyRefunded) => "ALREADY_REFUNDED",
        DomainError::Payment(_) => "INVALID_PAYMENT",
        DomainError::Auth(AuthError::Forbidden) => "FORBIDDEN",
        DomainError::Auth(_) | DomainError::Token(_) => match status_for(error) {
            StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
            StatusCode::INTERNAL_SERVER_ERROR => "INTERNAL_ERROR",
            _ => "BAD_REQUEST",
        },
        _ => "INTERNAL_ERROR",
    }
}

/// Per-field detail for validation failures
fn field_errors(error: &DomainError) -> Option<Value> {
    match error {
        DomainError::ValidationErr(ValidationError::MissingFields { fields }) => Some(Value::Array(
            fields
                .iter()
                .map(|field| json!({ "field": field, "message": format!("{} is required", field) }))
                .collect(),
        )),
        DomainError::ValidationErr(ValidationError::InvalidInput { field, message }) => {
            Some(json!([{ "field": field, "message": message }]))
        }
        DomainError::ValidationErr(ValidationError::InvalidEmail) => {
            Some(json!([{ "field": "email", "message": error.to_string() }]))
        }
        DomainError::ValidationErr(ValidationError::WeakPassword { reason }) => {
            Some(json!([{ "field": "password", "message": reason }]))
        }
        _ => None,
    }
}

/// Client-facing message; server faults never leak their details
fn public_message(error: &DomainError, status: StatusCode, fallback: Option<&str>) -> String {
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        fallback.unwrap_or(INTERNAL_MESSAGE).to_string()
    } else {
        error.to_string()
    }
}

fn log_error(error: &DomainError, status: StatusCode) {
    if status.is_server_error() {
        error!(error = %error, "Request failed");
    } else {
        warn!(status = status.as_u16(), error = %error, "Request rejected");
    }
}

/// Account-family response for a domain error
///
/// `fallback` replaces the message of server-side failures.
pub fn account_error_response(error: &DomainError, fallback: Option<&str>) -> HttpResponse {
    let status = status_for(error);
    log_error(error, status);

    let mut body = json!({
        "success": false,
        "message": public_message(error, status, fallback),
    });
    if let Some(errors) = field_errors(error) {
        body["errors"] = errors;
    }
    HttpResponse::build(status).json(body)
}

/// Order-family response for a domain error
pub fn api_error_response(error: &DomainError) -> HttpResponse {
    let status = status_for(error);
    log_error(error, status);

    let mut body = ApiErrorBody::new(
        status.as_u16(),
        code_for(error),
        public_message(error, status, None),
    );
    if let Some(details) = field_errors(error) {
        body = body.with_details(details);
    }
    HttpResponse::build(status).json(body)
}

/// A domain error bound to the response shape of its endpoint
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    error: DomainError,
    family: ErrorFamily,
    fallback: Option<&'static str>,
}

impl ApiError {
    pub fn account(error: impl Into<DomainError>) -> Self {
        Self {
            error: error.into(),
            family: ErrorFamily::Account,
            fallback: None,
        }
    }

    pub fn api(error: impl Into<DomainError>) -> Self {
        Self {
            error: error.into(),
            family: ErrorFamily::Api,
            fallback: None,
        }
    }

    /// Message used when the error turns out to be internal
    pub fn or_message(mut self, fallback: &'static str) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn domain(&self) -> &DomainError {
        &self.error
    }
}

/// `map_err` adapter for account handlers with an endpoint-specific fallback
pub fn account_err(fallback: &'static str) -> impl Fn(DomainError) -> ApiError {
    move |error| ApiError::account(error).or_message(fallback)
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(&self.error)
    }

    fn error_response(&self) -> HttpResponse {
        match self.family {
            ErrorFamily::Account => account_error_response(&self.error, self.fallback),
            ErrorFamily::Api => api_error_response(&self.error),
        }
    }
}

/// Plain 400 in the shape used by the endpoint serving `path`
pub fn bad_request(path: &str, message: &str) -> HttpResponse {
    match ErrorFamily::for_path(path) {
        ErrorFamily::Account => HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": message,
        })),
        ErrorFamily::Api => HttpResponse::BadRequest().json(ApiErrorBody::new(
            StatusCode::BAD_REQUEST.as_u16(),
            "BAD_REQUEST",
            message,
        )),
    }
}

/// Body parse failures; registered through `web::JsonConfig`
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = %req.path(), error = %err, "Rejected JSON payload");
    let response = bad_request(req.path(), "Invalid JSON payload");
    actix_web::error::InternalError::from_response(err, response).into()
}

/// Query string failures; registered through `web::QueryConfig`
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = %req.path(), error = %err, "Rejected query string");
    let response = bad_request(req.path(), "Invalid query parameters");
    actix_web::error::InternalError::from_response(err, response).into()
}

/// Fallback for unmatched routes
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": format!("Route {} not found", req.uri()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&AuthError::UserAlreadyExists.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&AuthError::AccountLocked.into()), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&AuthError::Forbidden.into()), StatusCode::FORBIDDEN);
        assert_eq!(status_for(&AuthError::UserNotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&TokenError::TokenExpired.into()), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(
                &OrderError::InvalidTransition {
                    from: "CANCELLED".into(),
                    to: "SHIPPED".into()
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(status_for(&PaymentError::AlreadyRefunded.into()), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&DomainError::Storage { message: "disk".into() }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_family_for_path() {
        assert_eq!(ErrorFamily::for_path("/api/orders/1"), ErrorFamily::Api);
        assert_eq!(ErrorFamily::for_path("/api/v1/auth/login"), ErrorFamily::Account);
        assert_eq!(ErrorFamily::for_path("/health"), ErrorFamily::Account);
    }

    #[actix_web::test]
    async fn test_account_body_lists_missing_fields() {
        let error: DomainError = ValidationError::MissingFields {
            fields: vec!["email".into(), "password".into()],
        }
        .into();
        let body = body_of(account_error_response(&error, None)).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Missing required fields: email, password");
        assert_eq!(body["errors"][1]["field"], "password");
    }

    #[actix_web::test]
    async fn test_internal_details_are_hidden() {
        let error = DomainError::Storage { message: "orders.json: permission denied".into() };

        let body = body_of(account_error_response(&error, Some("Error logging in"))).await;
        assert_eq!(body["message"], "Error logging in");

        let body = body_of(api_error_response(&error)).await;
        assert_eq!(body["error"]["message"], INTERNAL_MESSAGE);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["status"], 500);
    }

    #[actix_web::test]
    async fn test_api_body_for_not_found() {
        let body = body_of(api_error_response(&DomainError::not_found("Order"))).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Order not found");
        assert!(body["error"]["timestamp"].is_string());
    }
}
