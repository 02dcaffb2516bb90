//! Authentication route handlers
//!
//! Registration, login, email verification, password reset, token refresh
//! and logout. Errors use the account body shape; server-side failures get
//! an endpoint-specific message instead of their details.

use actix_web::{web, HttpRequest, HttpResponse};
use op_shared::types::ApiResponse;

use crate::dto::auth::{
    AuthResponse, LoginRequest, PasswordResetRequest, RefreshTokenRequest, RegisterRequest,
    ResetPasswordRequest, TokenResponse,
};
use crate::handlers::{account_err, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

use super::session_meta;

/// Handler for POST /api/v1/auth/register
///
/// # Request
///
/// ```json
/// { "email": "...", "password": "...", "firstName": "...", "lastName": "..." }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// { "success": true, "token": "...", "refreshToken": "...", "user": { ... } }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing fields, invalid email, weak password or duplicate email
/// - 429 Too Many Requests: Credential rate limit exceeded
pub async fn register(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let result = state
        .auth
        .register(body.into_inner().into(), session_meta(&req))
        .await
        .map_err(account_err("Error registering user"))?;

    Ok(HttpResponse::Created().json(AuthResponse::from(result)))
}

/// Handler for POST /api/v1/auth/login
///
/// ## Errors
/// - 400 Bad Request: Email or password missing
/// - 401 Unauthorized: Invalid credentials or locked account
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let result = state
        .auth
        .login(&body.email, &body.password, session_meta(&req))
        .await
        .map_err(account_err("Error logging in"))?;

    Ok(HttpResponse::Ok().json(AuthResponse::from(result)))
}

/// Handler for GET /api/v1/auth/verify-email/{token}
pub async fn verify_email(
    state: web::Data<AppState>,
    token: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state
        .auth
        .verify_email(&token)
        .await
        .map_err(account_err("Error verifying email"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Email verified successfully")))
}

/// Handler for POST /api/v1/auth/request-password-reset
///
/// ## Errors
/// - 404 Not Found: No account for this email
/// - 500 Internal Server Error: The reset email could not be delivered
pub async fn request_password_reset(
    state: web::Data<AppState>,
    body: web::Json<PasswordResetRequest>,
) -> Result<HttpResponse, ApiError> {
    state
        .auth
        .request_password_reset(&body.email)
        .await
        .map_err(account_err("Error requesting password reset"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Password reset email sent")))
}

/// Handler for POST /api/v1/auth/reset-password
pub async fn reset_password(
    state: web::Data<AppState>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    state
        .auth
        .reset_password(&body.token, &body.password)
        .await
        .map_err(account_err("Error resetting password"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Password reset successful")))
}

/// Handler for POST /api/v1/auth/refresh
///
/// The presented refresh token is rotated out and stops working.
pub async fn refresh(
    state: web::Data<AppState>,
    body: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    let pair = state
        .auth
        .refresh(&body.refresh_token)
        .await
        .map_err(ApiError::account)?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}

/// Handler for POST /api/v1/auth/logout
///
/// Ends the session the access token belongs to. Requires a Bearer token.
pub async fn logout(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError> {
    state
        .auth
        .logout(auth.session_id)
        .await
        .map_err(ApiError::account)?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Logged out successfully")))
}
