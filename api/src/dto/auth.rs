use serde::{Deserialize, Serialize};
use validator::Validate;

use op_core::services::auth::{AuthResult, RegisterInput};
use op_core::services::token::TokenPair;
use op_core::services::user::UpdateProfile;
use op_core::UserProfile;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(request: RegisterRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordResetRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 50, message = "First name cannot exceed 50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 50, message = "Last name cannot exceed 50 characters"))]
    pub last_name: Option<String>,
    #[validate(url(message = "Profile picture must be a valid URL"))]
    pub profile_picture: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfile {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            profile_picture: request.profile_picture,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// Body of register and login responses
///
/// `token` is the access token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            success: true,
            token: result.tokens.access_token,
            refresh_token: result.tokens.refresh_token,
            token_type: result.tokens.token_type,
            expires_in: result.tokens.expires_in,
            user: result.user,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            success: true,
            token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserProfile,
}

impl UserResponse {
    pub fn new(user: UserProfile) -> Self {
        Self { success: true, user }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub count: usize,
    pub users: Vec<UserProfile>,
}
