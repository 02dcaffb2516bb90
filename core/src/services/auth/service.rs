//! Main authentication service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::session::SessionMeta;
use crate::domain::entities::user::{User, UserProfile};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::UserRepository;
use crate::services::email::{password_reset_email, verification_email, EmailSender};
use crate::services::token::{generate_opaque_token, hash_token, TokenPair, TokenService};
use op_shared::validation::{check_password_strength, normalize_email};

use super::config::AuthServiceConfig;
use super::input::RegisterInput;
use super::password::{hash_password, verify_password};

/// Account plus the token pair of the session just opened
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub user: UserProfile,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Authentication service for registration, login and account recovery
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    email: Arc<dyn EmailSender>,
    config: AuthServiceConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        email: Arc<dyn EmailSender>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            users,
            tokens,
            email,
            config,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Register a new account and log it in
    ///
    /// A verification email is sent; delivery failure does not fail the
    /// registration.
    ///
    /// # Returns
    ///
    /// * `Err(ValidationError)` - Missing fields, bad email or weak password
    /// * `Err(AuthError::UserAlreadyExists)` - Email already registered
    pub async fn register(&self, input: RegisterInput, meta: SessionMeta) -> DomainResult<AuthResult> {
        let account = input.validate()?;

        if self.users.find_by_email(&account.email).await?.is_some() {
            warn!(target: "security", event = "REGISTER_DUPLICATE", email = %account.email, "Registration for existing email");
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = hash_password(&account.password, self.config.bcrypt_cost).await?;
        let verification_token = generate_opaque_token();

        let mut user = User::new(
            account.email,
            password_hash,
            account.first_name,
            account.last_name,
        );
        user.verification_token_hash = Some(hash_token(&verification_token));
        let user = self.users.create(user).await?;

        let message = verification_email(&user, &verification_token, &self.config.frontend_url);
        if let Err(e) = self.email.send(message).await {
            warn!(user_id = %user.id, error = %e, "Verification email could not be sent");
        }

        let tokens = self.tokens.issue(&user, meta).await?;
        info!(target: "security", event = "REGISTER", user_id = %user.id, "User registered");

        Ok(AuthResult {
            user: user.profile(),
            tokens,
        })
    }

    /// Log in with email and password
    ///
    /// Every failed attempt counts toward the account lock.
    pub async fn login(&self, email: &str, password: &str, meta: SessionMeta) -> DomainResult<AuthResult> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ValidationError::invalid("credentials", "Please provide email and password").into());
        }

        let email = normalize_email(email);
        let ip = meta.ip_address.clone().unwrap_or_default();

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!(target: "security", event = "LOGIN_FAILED", email = %email, ip = %ip, reason = "unknown_email", "Login failed");
            return Err(AuthError::InvalidCredentials.into());
        };

        let now = Utc::now();
        if user.is_locked(now) {
            warn!(target: "security", event = "LOGIN_LOCKED", user_id = %user.id, ip = %ip, "Login attempt on locked account");
            return Err(AuthError::AccountLocked.into());
        }

        if !verify_password(password, &user.password_hash).await? {
            let max_attempts = self.config.max_login_attempts;
            let lock_duration = Duration::seconds(self.config.lock_duration_seconds);
            let user = self
                .users
                .modify(
                    user.id,
                    Box::new(move |user: &mut User| -> DomainResult<()> {
                        user.register_failed_login(now, max_attempts, lock_duration);
                        Ok(())
                    }),
                )
                .await?;
            let locked = user.is_locked(now);
            let attempts = user.login_attempts;

            if locked {
                warn!(target: "security", event = "ACCOUNT_LOCKED", user_id = %user.id, ip = %ip, attempts, "Account locked after repeated failures");
            } else {
                warn!(target: "security", event = "LOGIN_FAILED", user_id = %user.id, ip = %ip, attempts, reason = "bad_password", "Login failed");
            }
            return Err(AuthError::InvalidCredentials.into());
        }

        let user = self
            .users
            .modify(
                user.id,
                Box::new(move |user: &mut User| -> DomainResult<()> {
                    user.register_successful_login(now);
                    Ok(())
                }),
            )
            .await?;
        let tokens = self.tokens.issue(&user, meta).await?;

        info!(target: "security", event = "LOGIN_SUCCESS", user_id = %user.id, ip = %ip, "User logged in");
        Ok(AuthResult {
            user: user.profile(),
            tokens,
        })
    }

    /// Confirm an email address with the emailed token
    pub async fn verify_email(&self, token: &str) -> DomainResult<UserProfile> {
        let mut user = self
            .users
            .find_by_verification_token(&hash_token(token))
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidVerificationToken))?;

        user.verify();
        let user = self.users.update(user).await?;

        info!(target: "security", event = "EMAIL_VERIFIED", user_id = %user.id, "Email verified");
        Ok(user.profile())
    }

    /// Email a password reset link
    ///
    /// # Returns
    ///
    /// * `Err(AuthError::UserNotFound)` - No account for this email
    /// * `Err(AuthError::EmailDeliveryFailed)` - The token was discarded
    pub async fn request_password_reset(&self, email: &str) -> DomainResult<()> {
        let email = normalize_email(email);
        let mut user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::Auth(AuthError::UserNotFound))?;

        let reset_token = generate_opaque_token();
        user.reset_password_token_hash = Some(hash_token(&reset_token));
        user.reset_password_expires =
            Some(Utc::now() + Duration::seconds(self.config.reset_token_expiry_seconds));
        user.updated_at = Utc::now();
        let mut user = self.users.update(user).await?;

        let message = password_reset_email(
            &user,
            &reset_token,
            &self.config.frontend_url,
            self.config.reset_token_expiry_seconds / 60,
        );

        match self.email.send(message).await {
            Ok(_) => {
                info!(target: "security", event = "PASSWORD_RESET_REQUESTED", user_id = %user.id, "Password reset requested");
                Ok(())
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Password reset email could not be sent");
                user.reset_password_token_hash = None;
                user.reset_password_expires = None;
                self.users.update(user).await?;
                Err(AuthError::EmailDeliveryFailed.into())
            }
        }
    }

    /// Set a new password using a reset token
    ///
    /// All sessions of the account are revoked.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> DomainResult<UserProfile> {
        check_password_strength(new_password).map_err(|rule| ValidationError::WeakPassword {
            reason: rule.message().to_string(),
        })?;

        let user = self
            .users
            .find_by_reset_token(&hash_token(token))
            .await?
            .filter(|user| user.reset_token_valid(Utc::now()));
        let Some(mut user) = user else {
            return Err(AuthError::InvalidResetToken.into());
        };

        let password_hash = hash_password(new_password, self.config.bcrypt_cost).await?;
        user.set_password_hash(password_hash);
        let user = self.users.update(user).await?;

        self.tokens.revoke_all(user.id, None).await?;
        info!(target: "security", event = "PASSWORD_RESET", user_id = %user.id, "Password reset");

        Ok(user.profile())
    }

    /// Exchange a refresh token for a new pair
    ///
    /// The presented refresh token stops working.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        if refresh_token.is_empty() {
            return Err(TokenError::InvalidRefreshToken.into());
        }

        let (session, replacement) = self.tokens.rotate(refresh_token).await?;
        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        self.tokens.pair_for(&user, &session, replacement)
    }

    /// End one session
    pub async fn logout(&self, session_id: Uuid) -> DomainResult<()> {
        if self.tokens.revoke(session_id).await? {
            info!(target: "security", event = "LOGOUT", session_id = %session_id, "User logged out");
        }
        Ok(())
    }
}
