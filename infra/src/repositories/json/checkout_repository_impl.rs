//! JSON file implementation of the CheckoutRepository trait.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use op_core::domain::entities::checkout::Checkout;
use op_core::errors::DomainError;
use op_core::repositories::CheckoutRepository;

use crate::storage::{JsonStore, CHECKOUT_SESSIONS};

pub struct JsonCheckoutRepository {
    store: Arc<JsonStore>,
}

impl JsonCheckoutRepository {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CheckoutRepository for JsonCheckoutRepository {
    async fn create(&self, checkout: Checkout) -> Result<Checkout, DomainError> {
        self.store
            .update(CHECKOUT_SESSIONS, move |checkouts: &mut Vec<Checkout>| {
                checkouts.push(checkout.clone());
                Ok::<_, DomainError>(checkout)
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Checkout>, DomainError> {
        let checkouts: Vec<Checkout> = self.store.read(CHECKOUT_SESSIONS).await?;
        Ok(checkouts.into_iter().find(|c| c.id == id))
    }
}
