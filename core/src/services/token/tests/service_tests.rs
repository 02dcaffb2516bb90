//! Unit tests for the token service

use std::sync::Arc;

use crate::domain::entities::session::SessionMeta;
use crate::domain::entities::user::{User, UserRole};
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{InMemorySessionRepository, SessionRepository};
use crate::services::token::{hash_token, TokenService, TokenServiceConfig};

fn config() -> TokenServiceConfig {
    TokenServiceConfig {
        jwt_secret: "unit-test-secret".to_string(),
        ..TokenServiceConfig::default()
    }
}

fn setup() -> (TokenService, Arc<InMemorySessionRepository>) {
    let sessions = Arc::new(InMemorySessionRepository::new());
    let service = TokenService::new(sessions.clone(), config());
    (service, sessions)
}

fn user() -> User {
    User::new("token@example.com", "hash", "Token", "Tester")
}

#[tokio::test]
async fn test_issue_and_verify() {
    let (service, sessions) = setup();
    let user = user();

    let pair = service
        .issue(
            &user,
            SessionMeta {
                user_agent: Some("tests".to_string()),
                ip_address: Some("127.0.0.1".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(pair.token_type, "Bearer");
    assert_eq!(pair.expires_in, 86_400);

    let claims = service.verify_access_token(&pair.access_token).await.unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.session_id().unwrap(), pair.session_id);
    assert_eq!(claims.role, UserRole::User);
    assert_eq!(claims.email, "token@example.com");

    let stored = sessions.find_by_id(pair.session_id).await.unwrap().unwrap();
    assert_eq!(stored.refresh_token_hash, hash_token(&pair.refresh_token));
    assert_eq!(stored.user_agent.as_deref(), Some("tests"));
}

#[tokio::test]
async fn test_revoked_session_rejects_access_token() {
    let (service, _) = setup();
    let pair = service.issue(&user(), SessionMeta::default()).await.unwrap();

    assert!(service.revoke(pair.session_id).await.unwrap());

    let result = service.verify_access_token(&pair.access_token).await;
    assert_eq!(result.unwrap_err(), DomainError::Auth(AuthError::SessionExpired));
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let (service, _) = setup();
    let pair = service.issue(&user(), SessionMeta::default()).await.unwrap();

    let other = TokenService::new(
        Arc::new(InMemorySessionRepository::new()),
        TokenServiceConfig {
            jwt_secret: "another-secret".to_string(),
            ..TokenServiceConfig::default()
        },
    );

    assert_eq!(
        other.decode_access_token(&pair.access_token).unwrap_err(),
        DomainError::Token(TokenError::InvalidToken)
    );
    assert_eq!(
        service.decode_access_token("not.a.jwt").unwrap_err(),
        DomainError::Token(TokenError::InvalidToken)
    );
}

#[tokio::test]
async fn test_rotation_invalidates_previous_refresh_token() {
    let (service, _) = setup();
    let pair = service.issue(&user(), SessionMeta::default()).await.unwrap();

    let (session, replacement) = service.rotate(&pair.refresh_token).await.unwrap();
    assert_eq!(session.id, pair.session_id);
    assert_ne!(replacement, pair.refresh_token);

    let reuse = service.rotate(&pair.refresh_token).await;
    assert_eq!(
        reuse.unwrap_err(),
        DomainError::Token(TokenError::InvalidRefreshToken)
    );

    assert!(service.rotate(&replacement).await.is_ok());
}

#[tokio::test]
async fn test_refresh_on_revoked_session_fails() {
    let (service, _) = setup();
    let u = user();
    let first = service.issue(&u, SessionMeta::default()).await.unwrap();
    let second = service.issue(&u, SessionMeta::default()).await.unwrap();

    let revoked = service.revoke_all(u.id, Some(second.session_id)).await.unwrap();
    assert_eq!(revoked, 1);

    assert!(service.rotate(&first.refresh_token).await.is_err());
    assert!(service.rotate(&second.refresh_token).await.is_ok());
}
