//! JSON file implementation of the OrderRepository trait.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use op_core::domain::entities::order::Order;
use op_core::errors::DomainError;
use op_core::repositories::{apply_mutation, Guard, Mutation, OrderRepository};

use crate::storage::{JsonStore, ORDERS};

/// Orders stored in `orders.json`, in insertion order
pub struct JsonOrderRepository {
    store: Arc<JsonStore>,
}

impl JsonOrderRepository {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OrderRepository for JsonOrderRepository {
    async fn list(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.store.read(ORDERS).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.list().await?.into_iter().find(|o| o.id == id))
    }

    async fn create(&self, order: Order) -> Result<Order, DomainError> {
        self.store
            .update(ORDERS, move |orders: &mut Vec<Order>| {
                orders.push(order.clone());
                Ok::<_, DomainError>(order)
            })
            .await
    }

    async fn update(&self, order: Order) -> Result<Order, DomainError> {
        self.store
            .update(ORDERS, move |orders: &mut Vec<Order>| {
                match orders.iter_mut().find(|o| o.id == order.id) {
                    Some(slot) => {
                        *slot = order.clone();
                        Ok(order)
                    }
                    None => Err(DomainError::not_found("Order")),
                }
            })
            .await
    }

    async fn modify(&self, id: Uuid, change: Mutation<Order>) -> Result<Order, DomainError> {
        self.store
            .update(ORDERS, move |orders: &mut Vec<Order>| {
                let slot = orders
                    .iter_mut()
                    .find(|o| o.id == id)
                    .ok_or_else(|| DomainError::not_found("Order"))?;
                apply_mutation(slot, change)
            })
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.store
            .update(ORDERS, move |orders: &mut Vec<Order>| {
                let before = orders.len();
                orders.retain(|o| o.id != id);
                Ok::<_, DomainError>(orders.len() != before)
            })
            .await
    }

    async fn delete_if(&self, id: Uuid, check: Guard<Order>) -> Result<bool, DomainError> {
        self.store
            .update(ORDERS, move |orders: &mut Vec<Order>| {
                let Some(index) = orders.iter().position(|o| o.id == id) else {
                    return Ok(false);
                };
                check(&orders[index])?;
                orders.remove(index);
                Ok(true)
            })
            .await
    }
}
