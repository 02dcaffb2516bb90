//! In-memory implementation of PaymentRepository

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::payment::Payment;
use crate::errors::DomainError;
use crate::repositories::{apply_mutation, Mutation};

use super::trait_::PaymentRepository;

#[derive(Clone, Default)]
pub struct InMemoryPaymentRepository {
    payments: Arc<RwLock<Vec<Payment>>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create(&self, payment: Payment) -> Result<Payment, DomainError> {
        self.payments.write().await.push(payment.clone());
        Ok(payment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, DomainError> {
        let payments = self.payments.read().await;
        Ok(payments.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_order(&self, order_id: &str) -> Result<Option<Payment>, DomainError> {
        let payments = self.payments.read().await;
        Ok(payments.iter().find(|p| p.order_id == order_id).cloned())
    }

    async fn update(&self, payment: Payment) -> Result<Payment, DomainError> {
        let mut payments = self.payments.write().await;
        match payments.iter_mut().find(|p| p.id == payment.id) {
            Some(existing) => {
                *existing = payment.clone();
                Ok(payment)
            }
            None => Err(DomainError::not_found("Payment")),
        }
    }

    async fn modify(&self, id: Uuid, change: Mutation<Payment>) -> Result<Payment, DomainError> {
        let mut payments = self.payments.write().await;
        let slot = payments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("Payment"))?;
        apply_mutation(slot, change)
    }

    async fn list(&self) -> Result<Vec<Payment>, DomainError> {
        Ok(self.payments.read().await.clone())
    }
}
