//! Unit tests for the authentication service

use std::sync::Arc;

use chrono::{Duration, Utc};

use super::RecordingEmailSender;
use crate::domain::entities::session::SessionMeta;
use crate::errors::{AuthError, DomainError, TokenError, ValidationError};
use crate::repositories::{InMemorySessionRepository, InMemoryUserRepository, UserRepository};
use crate::services::auth::{AuthService, AuthServiceConfig, RegisterInput};
use crate::services::token::{TokenService, TokenServiceConfig};

const PASSWORD: &str = "Corr3ct!Horse";

struct Harness {
    service: AuthService,
    users: Arc<InMemoryUserRepository>,
    email: Arc<RecordingEmailSender>,
    tokens: Arc<TokenService>,
}

fn config() -> AuthServiceConfig {
    AuthServiceConfig {
        bcrypt_cost: 4,
        max_login_attempts: 3,
        lock_duration_seconds: 3600,
        reset_token_expiry_seconds: 3600,
        frontend_url: "http://frontend.test".to_string(),
    }
}

fn harness_with(email: RecordingEmailSender) -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let sessions = Arc::new(InMemorySessionRepository::new());
    let tokens = Arc::new(TokenService::new(
        sessions,
        TokenServiceConfig {
            jwt_secret: "auth-test-secret".to_string(),
            ..TokenServiceConfig::default()
        },
    ));
    let email = Arc::new(email);
    let service = AuthService::new(users.clone(), tokens.clone(), email.clone(), config());
    Harness {
        service,
        users,
        email,
        tokens,
    }
}

fn harness() -> Harness {
    harness_with(RecordingEmailSender::default())
}

fn registration(email: &str) -> RegisterInput {
    RegisterInput {
        email: Some(email.to_string()),
        password: Some(PASSWORD.to_string()),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
    }
}

#[tokio::test]
async fn test_register_creates_user_and_sends_verification() {
    let h = harness();

    let result = h
        .service
        .register(registration("Ada@Example.com"), SessionMeta::default())
        .await
        .unwrap();

    assert_eq!(result.user.email, "ada@example.com");
    assert!(!result.user.is_verified);
    assert_eq!(result.tokens.token_type, "Bearer");

    let stored = h.users.find_by_email("ada@example.com").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, PASSWORD);
    assert!(stored.verification_token_hash.is_some());

    let sent = h.email.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@example.com");
    assert!(sent[0].text.contains("http://frontend.test/verify-email/"));

    h.tokens
        .verify_access_token(&result.tokens.access_token)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let h = harness();
    h.service
        .register(registration("dup@example.com"), SessionMeta::default())
        .await
        .unwrap();

    let err = h
        .service
        .register(registration("DUP@example.com"), SessionMeta::default())
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::UserAlreadyExists));
}

#[tokio::test]
async fn test_register_survives_email_failure() {
    let h = harness_with(RecordingEmailSender::failing());
    let result = h
        .service
        .register(registration("quiet@example.com"), SessionMeta::default())
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_verify_email_consumes_token() {
    let h = harness();
    h.service
        .register(registration("verify@example.com"), SessionMeta::default())
        .await
        .unwrap();
    let token = h.email.last_token("verify-email").unwrap();

    let profile = h.service.verify_email(&token).await.unwrap();
    assert!(profile.is_verified);

    let err = h.service.verify_email(&token).await.unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidVerificationToken));
}

#[tokio::test]
async fn test_login_success_resets_attempts() {
    let h = harness();
    h.service
        .register(registration("login@example.com"), SessionMeta::default())
        .await
        .unwrap();

    let _ = h
        .service
        .login("login@example.com", "Wr0ng!Password", SessionMeta::default())
        .await;
    let result = h
        .service
        .login(" LOGIN@example.com ", PASSWORD, SessionMeta::default())
        .await
        .unwrap();

    assert!(result.user.last_login.is_some());
    let stored = h.users.find_by_email("login@example.com").await.unwrap().unwrap();
    assert_eq!(stored.login_attempts, 0);
}

#[tokio::test]
async fn test_login_unknown_email_is_invalid_credentials() {
    let h = harness();
    let err = h
        .service
        .login("ghost@example.com", PASSWORD, SessionMeta::default())
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let h = harness();
    let err = h
        .service
        .login("", "", SessionMeta::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_repeated_failures_lock_account() {
    let h = harness();
    h.service
        .register(registration("lock@example.com"), SessionMeta::default())
        .await
        .unwrap();

    for _ in 0..3 {
        let err = h
            .service
            .login("lock@example.com", "Wr0ng!Password", SessionMeta::default())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Auth(AuthError::InvalidCredentials));
    }

    let err = h
        .service
        .login("lock@example.com", PASSWORD, SessionMeta::default())
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::AccountLocked));
}

#[tokio::test]
async fn test_expired_lock_allows_login() {
    let h = harness();
    h.service
        .register(registration("expired@example.com"), SessionMeta::default())
        .await
        .unwrap();

    let mut user = h.users.find_by_email("expired@example.com").await.unwrap().unwrap();
    user.login_attempts = 3;
    user.lock_until = Some(Utc::now() - Duration::minutes(1));
    h.users.update(user).await.unwrap();

    h.service
        .login("expired@example.com", PASSWORD, SessionMeta::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_password_reset_flow() {
    let h = harness();
    let first = h
        .service
        .register(registration("reset@example.com"), SessionMeta::default())
        .await
        .unwrap();

    h.service
        .request_password_reset("reset@example.com")
        .await
        .unwrap();
    let token = h.email.last_token("reset-password").unwrap();

    h.service.reset_password(&token, "N3w!Password").await.unwrap();

    // old session is gone, token is single use, new password works
    let err = h
        .tokens
        .verify_access_token(&first.tokens.access_token)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::SessionExpired));

    let err = h
        .service
        .reset_password(&token, "An0ther!Password")
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidResetToken));

    h.service
        .login("reset@example.com", "N3w!Password", SessionMeta::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_for_unknown_email_is_not_found() {
    let h = harness();
    let err = h
        .service
        .request_password_reset("nobody@example.com")
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::UserNotFound));
}

#[tokio::test]
async fn test_reset_email_failure_discards_token() {
    let h = harness_with(RecordingEmailSender::failing());
    h.service
        .register(registration("nomail@example.com"), SessionMeta::default())
        .await
        .unwrap();

    let err = h
        .service
        .request_password_reset("nomail@example.com")
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::EmailDeliveryFailed));

    let stored = h.users.find_by_email("nomail@example.com").await.unwrap().unwrap();
    assert!(stored.reset_password_token_hash.is_none());
}

#[tokio::test]
async fn test_expired_reset_token_rejected() {
    let h = harness();
    h.service
        .register(registration("late@example.com"), SessionMeta::default())
        .await
        .unwrap();
    h.service.request_password_reset("late@example.com").await.unwrap();
    let token = h.email.last_token("reset-password").unwrap();

    let mut user = h.users.find_by_email("late@example.com").await.unwrap().unwrap();
    user.reset_password_expires = Some(Utc::now() - Duration::seconds(1));
    h.users.update(user).await.unwrap();

    let err = h
        .service
        .reset_password(&token, "N3w!Password")
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::InvalidResetToken));
}

#[tokio::test]
async fn test_reset_checks_strength_first() {
    let h = harness();
    let err = h.service.reset_password("whatever", "short").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::WeakPassword { .. })
    ));
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let h = harness();
    let result = h
        .service
        .register(registration("refresh@example.com"), SessionMeta::default())
        .await
        .unwrap();

    let pair = h.service.refresh(&result.tokens.refresh_token).await.unwrap();
    assert_ne!(pair.refresh_token, result.tokens.refresh_token);
    assert_eq!(pair.session_id, result.tokens.session_id);

    let err = h
        .service
        .refresh(&result.tokens.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Token(TokenError::InvalidRefreshToken));
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let h = harness();
    let result = h
        .service
        .register(registration("bye@example.com"), SessionMeta::default())
        .await
        .unwrap();

    h.service.logout(result.tokens.session_id).await.unwrap();

    assert!(h
        .tokens
        .verify_access_token(&result.tokens.access_token)
        .await
        .is_err());
    assert!(h.service.refresh(&result.tokens.refresh_token).await.is_err());
}
