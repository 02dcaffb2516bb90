//! In-memory implementation of OrderRepository

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::order::Order;
use crate::errors::DomainError;
use crate::repositories::{apply_mutation, Guard, Mutation};

use super::trait_::OrderRepository;

/// Order repository kept in process memory, preserving insertion order
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn list(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.orders.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn create(&self, order: Order) -> Result<Order, DomainError> {
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn update(&self, order: Order) -> Result<Order, DomainError> {
        let mut orders = self.orders.write().await;
        match orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(order)
            }
            None => Err(DomainError::not_found("Order")),
        }
    }

    async fn modify(&self, id: Uuid, change: Mutation<Order>) -> Result<Order, DomainError> {
        let mut orders = self.orders.write().await;
        let slot = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| DomainError::not_found("Order"))?;
        apply_mutation(slot, change)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|o| o.id != id);
        Ok(orders.len() < before)
    }

    async fn delete_if(&self, id: Uuid, check: Guard<Order>) -> Result<bool, DomainError> {
        let mut orders = self.orders.write().await;
        let Some(index) = orders.iter().position(|o| o.id == id) else {
            return Ok(false);
        };
        check(&orders[index])?;
        orders.remove(index);
        Ok(true)
    }
}
