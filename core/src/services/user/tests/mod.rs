use std::sync::Arc;

use crate::domain::entities::session::SessionMeta;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, ValidationError};
use crate::repositories::{InMemorySessionRepository, InMemoryUserRepository, UserRepository};
use crate::services::auth::{hash_password, verify_password};
use crate::services::token::{TokenService, TokenServiceConfig};
use crate::services::user::{UpdateProfile, UserService};

const PASSWORD: &str = "0ld!Password";

async fn setup() -> (UserService, Arc<TokenService>, Arc<InMemoryUserRepository>, User) {
    let users = Arc::new(InMemoryUserRepository::new());
    let tokens = Arc::new(TokenService::new(
        Arc::new(InMemorySessionRepository::new()),
        TokenServiceConfig {
            jwt_secret: "user-test-secret".to_string(),
            ..TokenServiceConfig::default()
        },
    ));
    let hash = hash_password(PASSWORD, 4).await.unwrap();
    let user = users
        .create(User::new("grace@example.com", hash, "Grace", "Hopper"))
        .await
        .unwrap();
    let service = UserService::new(users.clone(), tokens.clone(), 4);
    (service, tokens, users, user)
}

#[tokio::test]
async fn test_get_profile() {
    let (service, _, _, user) = setup().await;
    let profile = service.get_profile(user.id).await.unwrap();
    assert_eq!(profile.email, "grace@example.com");

    let err = service.get_profile(uuid::Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::UserNotFound));
}

#[tokio::test]
async fn test_update_profile_changes_only_given_fields() {
    let (service, _, _, user) = setup().await;
    let profile = service
        .update_profile(
            user.id,
            UpdateProfile {
                first_name: Some(" Amazing Grace ".to_string()),
                profile_picture: Some("https://cdn.test/grace.png".to_string()),
                ..UpdateProfile::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(profile.first_name, "Amazing Grace");
    assert_eq!(profile.last_name, "Hopper");
    assert_eq!(profile.profile_picture.as_deref(), Some("https://cdn.test/grace.png"));
}

#[tokio::test]
async fn test_update_profile_rejects_empty_name() {
    let (service, _, _, user) = setup().await;
    let err = service
        .update_profile(
            user.id,
            UpdateProfile {
                last_name: Some("  ".to_string()),
                ..UpdateProfile::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn test_change_password_keeps_current_session_only() {
    let (service, tokens, users, user) = setup().await;
    let current = tokens.issue(&user, SessionMeta::default()).await.unwrap();
    let other = tokens.issue(&user, SessionMeta::default()).await.unwrap();

    service
        .change_password(user.id, Some(current.session_id), PASSWORD, "N3w!Password")
        .await
        .unwrap();

    assert!(tokens.verify_access_token(&current.access_token).await.is_ok());
    assert!(tokens.verify_access_token(&other.access_token).await.is_err());

    let stored = users.find_by_id(user.id).await.unwrap().unwrap();
    assert!(verify_password("N3w!Password", &stored.password_hash).await.unwrap());
}

#[tokio::test]
async fn test_change_password_wrong_current() {
    let (service, _, _, user) = setup().await;
    let err = service
        .change_password(user.id, None, "Wr0ng!Password", "N3w!Password")
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::IncorrectCurrentPassword));
}

#[tokio::test]
async fn test_change_password_rejects_weak_password() {
    let (service, _, _, user) = setup().await;
    let err = service
        .change_password(user.id, None, PASSWORD, "weak")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::WeakPassword { .. })
    ));
}

#[tokio::test]
async fn test_list_users() {
    let (service, _, users, _) = setup().await;
    users
        .create(User::new("second@example.com", "hash", "Second", "User"))
        .await
        .unwrap();

    let listed = service.list_users().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].email, "grace@example.com");
}
