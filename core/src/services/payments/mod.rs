//! Payment processing and refunds

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::order::round_currency;
use crate::domain::entities::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::errors::{DomainError, DomainResult, PaymentError};
use crate::repositories::{OrderRepository, PaymentRepository};

pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    orders: Arc<dyn OrderRepository>,
}

fn parse_amount(raw: &str) -> DomainResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(round_currency(amount)),
        _ => Err(PaymentError::InvalidAmount {
            message: "amount must be a positive number".to_string(),
        }
        .into()),
    }
}

impl PaymentService {
    pub fn new(payments: Arc<dyn PaymentRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { payments, orders }
    }

    /// Charge an existing order
    ///
    /// All three values arrive as raw query strings.
    pub async fn process(&self, order_id: &str, method: &str, amount: &str) -> DomainResult<Payment> {
        let order_id = order_id.trim();
        if order_id.is_empty() || method.trim().is_empty() || amount.trim().is_empty() {
            return Err(DomainError::invalid(
                "payment",
                "Order ID, payment method, and amount are required",
            ));
        }

        let amount = parse_amount(amount)?;
        let method: PaymentMethod = method
            .parse()
            .map_err(|value| PaymentError::InvalidMethod { value })?;

        let order = match Uuid::parse_str(order_id) {
            Ok(id) => self.orders.find_by_id(id).await?,
            Err(_) => None,
        };
        let order = order.ok_or_else(|| DomainError::not_found("Order"))?;

        let payment = self
            .payments
            .create(Payment::completed(order.id.to_string(), method, amount))
            .await?;
        info!(payment_id = %payment.id, order_id = %order.id, transaction_id = %payment.transaction_id, amount, "Payment processed");
        Ok(payment)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Payment> {
        self.payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment"))
    }

    pub async fn get_by_order(&self, order_id: &str) -> DomainResult<Payment> {
        self.payments
            .find_by_order(order_id.trim())
            .await?
            .ok_or_else(|| DomainError::not_found("Payment"))
    }

    /// Refund a payment, in full unless `amount` is given
    ///
    /// The status check and the refund are applied as one step, so a payment
    /// is refunded at most once.
    pub async fn refund(&self, id: Uuid, amount: Option<&str>) -> DomainResult<Payment> {
        let requested = match amount.map(str::trim).filter(|a| !a.is_empty()) {
            Some(raw) => Some(parse_amount(raw)?),
            None => None,
        };

        let payment = self
            .payments
            .modify(
                id,
                Box::new(move |payment: &mut Payment| -> DomainResult<()> {
                    if payment.status == PaymentStatus::Refunded {
                        return Err(PaymentError::AlreadyRefunded.into());
                    }
                    let amount = requested.unwrap_or(payment.amount);
                    if amount > payment.amount {
                        return Err(PaymentError::InvalidAmount {
                            message: format!(
                                "refund cannot exceed the paid amount of {:.2}",
                                payment.amount
                            ),
                        }
                        .into());
                    }
                    payment.refund(amount);
                    Ok(())
                }),
            )
            .await?;

        info!(payment_id = %payment.id, amount = ?payment.refund_amount, "Payment refunded");
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::order::{Order, OrderItem, OrderTotals};
    use crate::repositories::{InMemoryOrderRepository, InMemoryPaymentRepository};

    async fn setup() -> (PaymentService, Order) {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let items = vec![OrderItem {
            id: "i-1".to_string(),
            product_id: None,
            name: "Chair".to_string(),
            quantity: 1,
            unit_price: 80.0,
            category: None,
        }];
        let totals = OrderTotals::calculate(&items);
        let order = orders
            .create(Order::new("cust-1", items, totals))
            .await
            .unwrap();
        let service = PaymentService::new(Arc::new(InMemoryPaymentRepository::new()), orders);
        (service, order)
    }

    #[tokio::test]
    async fn test_process_and_lookup() {
        let (service, order) = setup().await;
        let payment = service
            .process(&order.id.to_string(), "credit_card", "97.40")
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.payment_method, PaymentMethod::CreditCard);
        assert_eq!(payment.amount, 97.4);

        assert_eq!(service.get(payment.id).await.unwrap(), payment);
        assert_eq!(
            service.get_by_order(&order.id.to_string()).await.unwrap().id,
            payment.id
        );
    }

    #[tokio::test]
    async fn test_process_validation() {
        let (service, order) = setup().await;
        let order_id = order.id.to_string();

        let err = service.process(&order_id, "", "10").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Order ID, payment method, and amount are required"
        );

        let err = service.process(&order_id, "PAYPAL", "-5").await.unwrap_err();
        assert!(matches!(err, DomainError::Payment(PaymentError::InvalidAmount { .. })));

        let err = service.process(&order_id, "CHEQUE", "5").await.unwrap_err();
        assert_eq!(
            err,
            DomainError::Payment(PaymentError::InvalidMethod {
                value: "CHEQUE".to_string()
            })
        );

        let err = service.process("not-an-order", "PAYPAL", "5").await.unwrap_err();
        assert_eq!(err.to_string(), "Order not found");
    }

    #[tokio::test]
    async fn test_full_refund_by_default() {
        let (service, order) = setup().await;
        let payment = service
            .process(&order.id.to_string(), "PAYPAL", "50")
            .await
            .unwrap();

        let refunded = service.refund(payment.id, None).await.unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);
        assert_eq!(refunded.refund_amount, Some(50.0));

        let err = service.refund(payment.id, Some("10")).await.unwrap_err();
        assert_eq!(err, DomainError::Payment(PaymentError::AlreadyRefunded));
    }

    #[tokio::test]
    async fn test_partial_refund_bounds() {
        let (service, order) = setup().await;
        let payment = service
            .process(&order.id.to_string(), "DEBIT_CARD", "50")
            .await
            .unwrap();

        let err = service.refund(payment.id, Some("60")).await.unwrap_err();
        assert!(matches!(err, DomainError::Payment(PaymentError::InvalidAmount { .. })));
        let err = service.refund(payment.id, Some("0")).await.unwrap_err();
        assert!(matches!(err, DomainError::Payment(PaymentError::InvalidAmount { .. })));

        let refunded = service.refund(payment.id, Some("20.5")).await.unwrap();
        assert_eq!(refunded.refund_amount, Some(20.5));
    }

    #[tokio::test]
    async fn test_unknown_payment() {
        let (service, _) = setup().await;
        let err = service.get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.to_string(), "Payment not found");
        let err = service.get_by_order("missing").await.unwrap_err();
        assert_eq!(err.to_string(), "Payment not found");
    }
}
