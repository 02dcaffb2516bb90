//! Checkout sessions and their conversion into orders

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::checkout::Checkout;
use crate::domain::entities::order::{round_currency, shipping_for, tax_for, Order, OrderItem};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::CheckoutRepository;
use crate::services::orders::{validate_address, validate_items};
use crate::services::orders::{NewOrder, OrderService};

pub struct CheckoutService {
    checkouts: Arc<dyn CheckoutRepository>,
    orders: Arc<OrderService>,
}

fn subtotal_of(items: &[OrderItem]) -> f64 {
    round_currency(items.iter().map(OrderItem::line_total).sum())
}

fn non_zero(value: f64) -> Option<f64> {
    Some(value).filter(|v| *v != 0.0)
}

impl CheckoutService {
    pub fn new(checkouts: Arc<dyn CheckoutRepository>, orders: Arc<OrderService>) -> Self {
        Self { checkouts, orders }
    }

    /// Start an empty checkout for a customer
    pub async fn initialize(&self, customer_id: &str) -> DomainResult<Checkout> {
        let customer_id = customer_id.trim();
        if customer_id.is_empty() {
            return Err(DomainError::invalid("customerId", "Customer ID is required"));
        }

        let checkout = self.checkouts.create(Checkout::new(customer_id)).await?;
        info!(checkout_id = %checkout.id, customer_id = %checkout.customer_id, "Checkout initialized");
        Ok(checkout)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Checkout> {
        self.checkouts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Checkout"))
    }

    /// Turn a checkout into an order
    ///
    /// Money fields left at zero are computed; non-zero values are kept.
    pub async fn process(&self, checkout: Checkout) -> DomainResult<Order> {
        if checkout.customer_id.trim().is_empty() {
            return Err(DomainError::invalid("customerId", "Customer ID is required"));
        }
        if checkout.items.is_empty() {
            return Err(DomainError::invalid(
                "items",
                "Checkout must contain at least one item",
            ));
        }

        let mut items = checkout.items;
        validate_items(&mut items)?;
        if let Some(address) = &checkout.shipping_address {
            validate_address("shippingAddress", address)?;
        }

        let subtotal = non_zero(checkout.subtotal).unwrap_or_else(|| subtotal_of(&items));
        let tax = non_zero(checkout.tax).unwrap_or_else(|| tax_for(subtotal));
        let shipping_cost =
            non_zero(checkout.shipping_cost).unwrap_or_else(|| shipping_for(items.len()));
        let total = non_zero(checkout.total)
            .unwrap_or_else(|| round_currency(subtotal + tax + shipping_cost));

        let order = self
            .orders
            .create(NewOrder {
                customer_id: Some(checkout.customer_id),
                customer_name: None,
                items,
                shipping_address: checkout.shipping_address,
                billing_address: checkout.billing_address,
                payment_method: checkout.payment_method,
                subtotal: Some(subtotal),
                tax: Some(tax),
                shipping_cost: Some(shipping_cost),
                total_amount: Some(total),
            })
            .await?;

        info!(checkout_id = %checkout.id, order_id = %order.id, "Checkout processed");
        Ok(order)
    }

    /// Flat base charge plus a per-item surcharge
    pub fn shipping_cost(&self, checkout: &Checkout) -> f64 {
        shipping_for(checkout.items.len())
    }

    /// Tax on the checkout subtotal, computed from the items when it is zero
    pub fn tax(&self, checkout: &Checkout) -> f64 {
        let subtotal = non_zero(checkout.subtotal).unwrap_or_else(|| subtotal_of(&checkout.items));
        tax_for(subtotal)
    }
}
