//! Account self-service and the admin user listing

use actix_web::{web, HttpResponse};
use op_shared::types::ApiResponse;
use validator::Validate;

use crate::dto::auth::{ChangePasswordRequest, UpdateProfileRequest, UserResponse, UsersResponse};
use crate::dto::validation_error;
use crate::handlers::{account_err, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for GET /api/v1/users/profile
pub async fn get_profile(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError> {
    let user = state
        .users
        .get_profile(auth.user_id)
        .await
        .map_err(account_err("Error fetching user profile"))?;

    Ok(HttpResponse::Ok().json(UserResponse::new(user)))
}

/// Handler for PUT /api/v1/users/profile
///
/// Only `firstName`, `lastName` and `profilePicture` can be changed.
pub async fn update_profile(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let changes = body.into_inner();
    changes
        .validate()
        .map_err(|errors| ApiError::account(validation_error(&errors)))?;

    let user = state
        .users
        .update_profile(auth.user_id, changes.into())
        .await
        .map_err(account_err("Error updating user profile"))?;

    Ok(HttpResponse::Ok().json(UserResponse::new(user)))
}

/// Handler for POST /api/v1/users/change-password
///
/// The calling session stays logged in; every other session is revoked.
pub async fn change_password(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    state
        .users
        .change_password(
            auth.user_id,
            Some(auth.session_id),
            &body.current_password,
            &body.new_password,
        )
        .await
        .map_err(account_err("Error changing password"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Password changed successfully")))
}

/// Handler for GET /api/v1/users
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users = state.users.list_users().await.map_err(ApiError::account)?;

    Ok(HttpResponse::Ok().json(UsersResponse {
        success: true,
        count: users.len(),
        users,
    }))
}
