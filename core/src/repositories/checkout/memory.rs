//! In-memory implementation of CheckoutRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::checkout::Checkout;
use crate::errors::DomainError;

use super::trait_::CheckoutRepository;

#[derive(Clone, Default)]
pub struct InMemoryCheckoutRepository {
    checkouts: Arc<RwLock<HashMap<Uuid, Checkout>>>,
}

impl InMemoryCheckoutRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckoutRepository for InMemoryCheckoutRepository {
    async fn create(&self, checkout: Checkout) -> Result<Checkout, DomainError> {
        self.checkouts
            .write()
            .await
            .insert(checkout.id, checkout.clone());
        Ok(checkout)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Checkout>, DomainError> {
        Ok(self.checkouts.read().await.get(&id).cloned())
    }
}
