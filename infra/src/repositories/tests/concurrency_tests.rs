//! Concurrent read-check-write paths over the JSON store

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use op_core::domain::entities::order::{Order, OrderItem, OrderStatus, OrderTotals};
use op_core::domain::entities::session::SessionMeta;
use op_core::domain::entities::user::User;
use op_core::errors::{DomainError, PaymentError};
use op_core::repositories::{OrderRepository, PaymentRepository, UserRepository};
use op_core::services::{OrderService, PaymentService, TokenService, TokenServiceConfig};
use op_shared::config::StorageConfig;

use crate::repositories::{
    JsonOrderRepository, JsonPaymentRepository, JsonSessionRepository, JsonUserRepository,
};
use crate::storage::JsonStore;

const ROUNDS: usize = 10;

async fn store(dir: &TempDir) -> Arc<JsonStore> {
    Arc::new(
        JsonStore::open(&StorageConfig::json(dir.path()))
            .await
            .unwrap(),
    )
}

async fn stored_order(orders: &Arc<JsonOrderRepository>) -> Order {
    let items = vec![OrderItem {
        id: "item-1".to_string(),
        product_id: None,
        name: "Lamp".to_string(),
        quantity: 1,
        unit_price: 40.0,
        category: None,
    }];
    let totals = OrderTotals::calculate(&items);
    orders.create(Order::new("cust-1", items, totals)).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_refresh_token_is_exchanged_once() {
    let dir = TempDir::new().unwrap();
    let sessions = Arc::new(JsonSessionRepository::new(store(&dir).await));
    let tokens = Arc::new(TokenService::new(sessions, TokenServiceConfig::default()));
    let user = User::new("race@example.com", "hash", "Race", "User");

    for _ in 0..ROUNDS {
        let pair = tokens.issue(&user, SessionMeta::default()).await.unwrap();
        let (first, second) = tokio::join!(
            tokens.rotate(&pair.refresh_token),
            tokens.rotate(&pair.refresh_token)
        );
        assert_eq!(
            [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
            1
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_payment_is_refunded_once() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir).await;
    let orders = Arc::new(JsonOrderRepository::new(store.clone()));
    let payments = Arc::new(JsonPaymentRepository::new(store));
    let service = PaymentService::new(payments.clone(), orders.clone());
    let order = stored_order(&orders).await;

    for _ in 0..ROUNDS {
        let payment = service
            .process(&order.id.to_string(), "PAYPAL", "50")
            .await
            .unwrap();
        let (small, large) = tokio::join!(
            service.refund(payment.id, Some("10")),
            service.refund(payment.id, Some("40"))
        );

        let winners: Vec<f64> = [small, large]
            .into_iter()
            .filter_map(|result| match result {
                Ok(refunded) => refunded.refund_amount,
                Err(err) => {
                    assert_eq!(err, DomainError::Payment(PaymentError::AlreadyRefunded));
                    None
                }
            })
            .collect();
        assert_eq!(winners.len(), 1);

        let stored = payments.find_by_id(payment.id).await.unwrap().unwrap();
        assert_eq!(stored.refund_amount, Some(winners[0]));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancelled_order_is_never_reopened() {
    let dir = TempDir::new().unwrap();
    let orders = Arc::new(JsonOrderRepository::new(store(&dir).await));
    let service = OrderService::new(orders.clone());

    for _ in 0..ROUNDS {
        let order = stored_order(&orders).await;
        let (cancel, process) = tokio::join!(
            service.update_status(order.id, "CANCELLED"),
            service.update_status(order.id, "PROCESSING")
        );
        assert!(cancel.is_ok());

        let status = orders.find_by_id(order.id).await.unwrap().unwrap().status;
        assert_eq!(status, OrderStatus::Cancelled);
        if let Err(err) = process {
            assert!(err.to_string().contains("CANCELLED"), "{}", err);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failed_logins_are_all_counted() {
    let dir = TempDir::new().unwrap();
    let users = Arc::new(JsonUserRepository::new(store(&dir).await));
    let user = users
        .create(User::new("count@example.com", "hash", "Count", "User"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..ROUNDS {
        let users = users.clone();
        handles.push(tokio::spawn(async move {
            users
                .modify(
                    user.id,
                    Box::new(|user: &mut User| -> Result<(), DomainError> {
                        user.register_failed_login(Utc::now(), 100, Duration::minutes(15));
                        Ok(())
                    }),
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.login_attempts, ROUNDS as u32);
}
