//! JWT authentication and role checks for protected endpoints.
//!
//! `JwtAuth` reads the access token from the `Authorization: Bearer` header
//! or, failing that, the `token` cookie. It verifies the token together with
//! the session it belongs to and stores an [`AuthContext`] in the request
//! extensions. `RequireRole` must run inside `JwtAuth`.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use op_core::domain::entities::user::UserRole;
use op_core::errors::{AuthError, DomainError};
use op_core::services::token::Claims;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::handlers::error::account_error_response;
use crate::state::AppState;

/// Cookie consulted when no bearer token is sent
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated caller, available to handlers as an extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub email: String,
    pub role: UserRole,
    /// JWT ID for tracking
    pub jti: String,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Result<Self, DomainError> {
        Ok(Self {
            user_id: claims.user_id()?,
            session_id: claims.session_id()?,
            email: claims.email,
            role: claims.role,
            jti: claims.jti,
        })
    }
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let outcome = match extract_token(&req) {
                Some(token) => match req.app_data::<web::Data<AppState>>() {
                    Some(state) => state
                        .tokens
                        .verify_access_token(&token)
                        .await
                        .and_then(AuthContext::from_claims),
                    None => Err(DomainError::internal("Token service is not configured")),
                },
                None => Err(AuthError::Unauthorized.into()),
            };

            match outcome {
                Ok(context) => {
                    debug!(user_id = %context.user_id, path = %req.path(), "Request authenticated");
                    req.extensions_mut().insert(context);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Err(error) => {
                    warn!(
                        target: "security",
                        event = "AUTH_FAILURE",
                        path = %req.path(),
                        reason = %error,
                        "Rejected unauthenticated request"
                    );
                    let response = account_error_response(&error, None);
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Bearer token from the `Authorization` header, else the `token` cookie
pub fn extract_token(req: &ServiceRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    bearer.or_else(|| {
        req.cookie(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// Restricts a resource to the given roles
#[derive(Debug, Clone)]
pub struct RequireRole {
    roles: Rc<[UserRole]>,
}

impl RequireRole {
    pub fn new(roles: &[UserRole]) -> Self {
        Self {
            roles: Rc::from(roles),
        }
    }

    pub fn admin() -> Self {
        Self::new(&[UserRole::Admin])
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            roles: Rc::clone(&self.roles),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    roles: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let roles = Rc::clone(&self.roles);

        Box::pin(async move {
            let context = req.extensions().get::<AuthContext>().cloned();
            let rejection: Option<DomainError> = match context {
                None => Some(AuthError::Unauthorized.into()),
                Some(context) if !roles.contains(&context.role) => {
                    warn!(
                        target: "security",
                        event = "ROLE_CHECK_FAILURE",
                        user_id = %context.user_id,
                        role = %context.role,
                        path = %req.path(),
                        "Insufficient permissions"
                    );
                    Some(AuthError::Forbidden.into())
                }
                Some(_) => None,
            };

            match rejection {
                None => service.call(req).await.map(ServiceResponse::map_into_left_body),
                Some(error) => {
                    let response = account_error_response(&error, None);
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| crate::handlers::ApiError::account(AuthError::Unauthorized).into());

        ready(result)
    }
}
