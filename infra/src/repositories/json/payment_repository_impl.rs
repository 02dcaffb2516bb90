//! JSON file implementation of the PaymentRepository trait.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use op_core::domain::entities::payment::Payment;
use op_core::errors::DomainError;
use op_core::repositories::{apply_mutation, Mutation, PaymentRepository};

use crate::storage::{JsonStore, PAYMENTS};

pub struct JsonPaymentRepository {
    store: Arc<JsonStore>,
}

impl JsonPaymentRepository {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PaymentRepository for JsonPaymentRepository {
    async fn create(&self, payment: Payment) -> Result<Payment, DomainError> {
        self.store
            .update(PAYMENTS, move |payments: &mut Vec<Payment>| {
                payments.push(payment.clone());
                Ok::<_, DomainError>(payment)
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, DomainError> {
        Ok(self.list().await?.into_iter().find(|p| p.id == id))
    }

    async fn find_by_order(&self, order_id: &str) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|p| p.order_id == order_id))
    }

    async fn update(&self, payment: Payment) -> Result<Payment, DomainError> {
        self.store
            .update(PAYMENTS, move |payments: &mut Vec<Payment>| {
                match payments.iter_mut().find(|p| p.id == payment.id) {
                    Some(slot) => {
                        *slot = payment.clone();
                        Ok(payment)
                    }
                    None => Err(DomainError::not_found("Payment")),
                }
            })
            .await
    }

    async fn modify(&self, id: Uuid, change: Mutation<Payment>) -> Result<Payment, DomainError> {
        self.store
            .update(PAYMENTS, move |payments: &mut Vec<Payment>| {
                let slot = payments
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| DomainError::not_found("Payment"))?;
                apply_mutation(slot, change)
            })
            .await
    }

    async fn list(&self) -> Result<Vec<Payment>, DomainError> {
        Ok(self.store.read(PAYMENTS).await?)
    }
}
