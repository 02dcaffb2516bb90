//! Payment repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::payment::Payment;
use crate::errors::DomainError;
use crate::repositories::Mutation;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: Payment) -> Result<Payment, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, DomainError>;

    /// First payment recorded against an order
    async fn find_by_order(&self, order_id: &str) -> Result<Option<Payment>, DomainError>;

    /// Replace a stored payment
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No payment with this id
    async fn update(&self, payment: Payment) -> Result<Payment, DomainError>;

    /// Apply `change` to a stored payment atomically
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No payment with this id
    /// * `Err(_)` - Whatever `change` rejected the payment with; nothing is written
    async fn modify(&self, id: Uuid, change: Mutation<Payment>) -> Result<Payment, DomainError>;

    async fn list(&self) -> Result<Vec<Payment>, DomainError>;
}
