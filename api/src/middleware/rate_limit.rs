//! Rate limiting middleware for API endpoints
//!
//! Counts requests per client IP in a [`RateLimitStore`] under a
//! [`RateLimitPolicy`]. Every response carries the `X-RateLimit-*` headers
//! of the innermost limiter it passed; rejected requests get a 429 with
//! `Retry-After`.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER},
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use op_core::services::rate_limit::{RateLimitDecision, RateLimitPolicy, RateLimitStore};
use serde_json::json;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};
use tracing::{error, warn};

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Default rejection message
pub const DEFAULT_MESSAGE: &str = "Too many requests, please try again later.";

/// Rejection message for login, registration and password reset
pub const AUTH_MESSAGE: &str =
    "Too many authentication attempts, please try again after 15 minutes.";

/// Rate limiter middleware factory
#[derive(Clone)]
pub struct RateLimit {
    store: Arc<dyn RateLimitStore>,
    policy: Arc<RateLimitPolicy>,
    message: &'static str,
    enabled: bool,
}

impl RateLimit {
    pub fn new(store: Arc<dyn RateLimitStore>, policy: RateLimitPolicy) -> Self {
        Self {
            store,
            policy: Arc::new(policy),
            message: DEFAULT_MESSAGE,
            enabled: true,
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = message;
        self
    }

    /// Pass every request through without counting
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();

        Box::pin(async move {
            if !limiter.enabled {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            let ip = get_client_ip(&req);
            let decision = match limiter.store.hit(&limiter.policy, &ip).await {
                Ok(decision) => decision,
                Err(e) => {
                    // fail open
                    error!(error = %e, policy = %limiter.policy.key_prefix, "Rate limit check failed");
                    return service.call(req).await.map(ServiceResponse::map_into_left_body);
                }
            };

            if !decision.allowed {
                warn!(
                    target: "security",
                    event = "RATE_LIMIT_EXCEEDED",
                    ip = %ip,
                    endpoint = %req.path(),
                    method = %req.method(),
                    policy = %limiter.policy.key_prefix,
                    "Rate limit exceeded"
                );
                let mut response = HttpResponse::TooManyRequests().json(json!({
                    "success": false,
                    "message": limiter.message,
                }));
                let headers = response.headers_mut();
                apply_headers(headers, &decision);
                headers.insert(RETRY_AFTER, HeaderValue::from(decision.reset_after_seconds));
                return Ok(req.into_response(response).map_into_right_body());
            }

            let mut response = service.call(req).await?;
            // A nested, more specific limiter has already reported its budget
            if !response.headers().contains_key(LIMIT_HEADER) {
                apply_headers(response.headers_mut(), &decision);
            }
            Ok(response.map_into_left_body())
        })
    }
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(
        HeaderName::from_static(LIMIT_HEADER),
        HeaderValue::from(decision.limit),
    );
    headers.insert(
        HeaderName::from_static(REMAINING_HEADER),
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        HeaderName::from_static(RESET_HEADER),
        HeaderValue::from(decision.reset_after_seconds),
    );
}

/// Get client IP address from request
pub fn get_client_ip(req: &ServiceRequest) -> String {
    // Try to get IP from X-Forwarded-For header (for reverse proxy scenarios)
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return ip.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return ip_str.trim().to_string();
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}
