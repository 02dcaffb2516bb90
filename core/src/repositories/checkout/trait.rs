//! Checkout session repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::checkout::Checkout;
use crate::errors::DomainError;

#[async_trait]
pub trait CheckoutRepository: Send + Sync {
    async fn create(&self, checkout: Checkout) -> Result<Checkout, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Checkout>, DomainError>;
}
