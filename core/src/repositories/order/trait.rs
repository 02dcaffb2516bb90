//! Order repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::order::Order;
use crate::errors::DomainError;
use crate::repositories::{Guard, Mutation};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Every stored order, in storage order
    async fn list(&self) -> Result<Vec<Order>, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;

    async fn create(&self, order: Order) -> Result<Order, DomainError>;

    /// Replace a stored order
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No order with this id
    async fn update(&self, order: Order) -> Result<Order, DomainError>;

    /// Apply `change` to a stored order atomically
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No order with this id
    /// * `Err(_)` - Whatever `change` rejected the order with; nothing is written
    async fn modify(&self, id: Uuid, change: Mutation<Order>) -> Result<Order, DomainError>;

    /// Remove an order; `Ok(false)` when it does not exist
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Remove an order if `check` accepts it, atomically
    ///
    /// `Ok(false)` when the order does not exist.
    async fn delete_if(&self, id: Uuid, check: Guard<Order>) -> Result<bool, DomainError>;
}
