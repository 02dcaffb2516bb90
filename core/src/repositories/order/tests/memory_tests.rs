//! Unit tests for the in-memory order repository

use uuid::Uuid;

use crate::domain::entities::order::{Order, OrderStatus, OrderTotals};
use crate::errors::DomainError;
use crate::repositories::order::{InMemoryOrderRepository, OrderRepository};
use crate::repositories::Guard;

fn order(customer: &str) -> Order {
    Order::new(customer, Vec::new(), OrderTotals::calculate(&[]))
}

#[tokio::test]
async fn test_list_preserves_insertion_order() {
    let repo = InMemoryOrderRepository::new();
    let first = repo.create(order("C-1")).await.unwrap();
    let second = repo.create(order("C-2")).await.unwrap();

    let ids: Vec<Uuid> = repo.list().await.unwrap().iter().map(|o| o.id).collect();

    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
async fn test_update_and_delete() {
    let repo = InMemoryOrderRepository::new();
    let mut stored = repo.create(order("C-1")).await.unwrap();

    stored.set_status(OrderStatus::Shipped);
    repo.update(stored.clone()).await.unwrap();
    let found = repo.find_by_id(stored.id).await.unwrap().unwrap();
    assert_eq!(found.status, OrderStatus::Shipped);

    assert!(repo.delete(stored.id).await.unwrap());
    assert!(!repo.delete(stored.id).await.unwrap());
    assert!(matches!(
        repo.update(stored).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_rejected_modify_leaves_order_untouched() {
    let repo = InMemoryOrderRepository::new();
    let stored = repo.create(order("C-1")).await.unwrap();

    let result = repo
        .modify(
            stored.id,
            Box::new(|order: &mut Order| -> Result<(), DomainError> {
                order.set_status(OrderStatus::Shipped);
                Err(DomainError::invalid("status", "rejected"))
            }),
        )
        .await;
    assert!(result.is_err());
    assert_eq!(
        repo.find_by_id(stored.id).await.unwrap().unwrap().status,
        OrderStatus::Created
    );

    let changed = repo
        .modify(
            stored.id,
            Box::new(|order: &mut Order| -> Result<(), DomainError> {
                order.set_status(OrderStatus::Processing);
                Ok(())
            }),
        )
        .await
        .unwrap();
    assert_eq!(changed.status, OrderStatus::Processing);
}

fn allow() -> Guard<Order> {
    Box::new(|_: &Order| -> Result<(), DomainError> { Ok(()) })
}

fn refuse() -> Guard<Order> {
    Box::new(|_: &Order| -> Result<(), DomainError> {
        Err(DomainError::invalid("order", "kept"))
    })
}

#[tokio::test]
async fn test_delete_if_respects_check() {
    let repo = InMemoryOrderRepository::new();
    let stored = repo.create(order("C-1")).await.unwrap();

    assert!(repo.delete_if(stored.id, refuse()).await.is_err());
    assert!(repo.find_by_id(stored.id).await.unwrap().is_some());

    assert!(repo.delete_if(stored.id, allow()).await.unwrap());
    assert!(!repo.delete_if(stored.id, allow()).await.unwrap());
}
