//! Tests for the JSON-backed repositories

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use op_core::domain::entities::checkout::Checkout;
use op_core::domain::entities::order::{Order, OrderItem, OrderStatus, OrderTotals};
use op_core::domain::entities::payment::{Payment, PaymentMethod};
use op_core::domain::entities::session::{Session, SessionMeta};
use op_core::domain::entities::user::User;
use op_core::errors::{AuthError, DomainError};
use op_core::repositories::{
    CheckoutRepository, OrderRepository, PaymentRepository, SessionRepository, UserRepository,
};
use op_shared::config::StorageConfig;

use crate::repositories::{
    JsonCheckoutRepository, JsonOrderRepository, JsonPaymentRepository, JsonSessionRepository,
    JsonUserRepository,
};
use crate::storage::JsonStore;

async fn store(dir: &TempDir) -> Arc<JsonStore> {
    Arc::new(
        JsonStore::open(&StorageConfig::json(dir.path()))
            .await
            .unwrap(),
    )
}

fn order(customer: &str) -> Order {
    let items = vec![OrderItem {
        id: "item-1".to_string(),
        product_id: None,
        name: "Desk".to_string(),
        quantity: 1,
        unit_price: 120.0,
        category: Some("Furniture".to_string()),
    }];
    let totals = OrderTotals::calculate(&items);
    Order::new(customer, items, totals)
}

#[tokio::test]
async fn test_user_repository_round_trip() {
    let dir = TempDir::new().unwrap();
    let repo = JsonUserRepository::new(store(&dir).await);

    let mut user = User::new("json@example.com", "hash", "Json", "User");
    user.verification_token_hash = Some("verify-hash".to_string());
    let user = repo.create(user).await.unwrap();

    let err = repo
        .create(User::new("json@example.com", "hash", "Dup", "User"))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Auth(AuthError::UserAlreadyExists));

    let found = repo.find_by_verification_token("verify-hash").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    let mut changed = user.clone();
    changed.verify();
    repo.update(changed).await.unwrap();

    // a fresh repository over the same directory sees the change
    let reopened = JsonUserRepository::new(store(&dir).await);
    let stored = reopened.find_by_email("json@example.com").await.unwrap().unwrap();
    assert!(stored.is_verified);
    assert!(stored.verification_token_hash.is_none());
}

#[tokio::test]
async fn test_user_update_unknown_user() {
    let dir = TempDir::new().unwrap();
    let repo = JsonUserRepository::new(store(&dir).await);
    let err = repo
        .update(User::new("ghost@example.com", "hash", "Ghost", "User"))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::not_found("User"));
}

#[tokio::test]
async fn test_session_repository_invalidation() {
    let dir = TempDir::new().unwrap();
    let repo = JsonSessionRepository::new(store(&dir).await);
    let user_id = uuid::Uuid::new_v4();

    let keep = repo
        .create(Session::new(user_id, "a".into(), Duration::days(1), SessionMeta::default()))
        .await
        .unwrap();
    let other = repo
        .create(Session::new(user_id, "b".into(), Duration::days(1), SessionMeta::default()))
        .await
        .unwrap();

    assert_eq!(repo.invalidate_all_for_user(user_id, Some(keep.id)).await.unwrap(), 1);
    assert!(repo.find_by_id(keep.id).await.unwrap().unwrap().is_valid);
    assert!(!repo.find_by_id(other.id).await.unwrap().unwrap().is_valid);
    assert_eq!(repo.find_by_refresh_token("a").await.unwrap().map(|s| s.id), Some(keep.id));

    assert!(repo.invalidate(keep.id).await.unwrap());
    assert!(!repo.invalidate(uuid::Uuid::new_v4()).await.unwrap());
    assert_eq!(repo.find_by_user(user_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_session_repository_deletes_expired() {
    let dir = TempDir::new().unwrap();
    let repo = JsonSessionRepository::new(store(&dir).await);
    let user_id = uuid::Uuid::new_v4();

    let mut expired = Session::new(user_id, "old".into(), Duration::days(1), SessionMeta::default());
    expired.expires_at = Utc::now() - Duration::hours(1);
    let expired = repo.create(expired).await.unwrap();
    repo.create(Session::new(user_id, "new".into(), Duration::days(1), SessionMeta::default()))
        .await
        .unwrap();

    // creating a session prunes already expired ones
    assert!(repo.find_by_id(expired.id).await.unwrap().is_none());
    assert_eq!(repo.delete_expired(Utc::now() + Duration::days(2)).await.unwrap(), 1);
    assert!(repo.find_by_user(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_order_repository_crud() {
    let dir = TempDir::new().unwrap();
    let repo = JsonOrderRepository::new(store(&dir).await);

    let first = repo.create(order("cust-1")).await.unwrap();
    let second = repo.create(order("cust-2")).await.unwrap();

    let listed = repo.list().await.unwrap();
    assert_eq!(
        listed.iter().map(|o| o.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );

    let mut shipped = first.clone();
    shipped.set_status(OrderStatus::Shipped);
    repo.update(shipped).await.unwrap();
    assert_eq!(
        repo.find_by_id(first.id).await.unwrap().unwrap().status,
        OrderStatus::Shipped
    );

    assert!(repo.delete(second.id).await.unwrap());
    assert!(!repo.delete(second.id).await.unwrap());
    assert_eq!(repo.list().await.unwrap().len(), 1);

    let raw = std::fs::read_to_string(dir.path().join("orders.json")).unwrap();
    assert!(raw.contains("\"orderNumber\""));
    assert!(raw.contains("\"SHIPPED\""));
}

#[tokio::test]
async fn test_payment_and_checkout_repositories() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir).await;
    let payments = JsonPaymentRepository::new(store.clone());
    let checkouts = JsonCheckoutRepository::new(store);

    let payment = payments
        .create(Payment::completed("order-1", PaymentMethod::Paypal, 25.0))
        .await
        .unwrap();
    assert_eq!(
        payments.find_by_order("order-1").await.unwrap().map(|p| p.id),
        Some(payment.id)
    );

    let mut refunded = payment.clone();
    refunded.refund(25.0);
    payments.update(refunded).await.unwrap();
    assert_eq!(
        payments.find_by_id(payment.id).await.unwrap().unwrap().refund_amount,
        Some(25.0)
    );

    let checkout = checkouts.create(Checkout::new("cust-3")).await.unwrap();
    assert_eq!(
        checkouts.find_by_id(checkout.id).await.unwrap().unwrap().customer_id,
        "cust-3"
    );
}
