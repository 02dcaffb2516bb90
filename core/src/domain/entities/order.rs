//! Order aggregate: orders, line items, addresses and totals.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sales tax applied to the subtotal
pub const TAX_RATE: f64 = 0.08;

/// Flat shipping charge per order
pub const BASE_SHIPPING: f64 = 10.0;

/// Shipping surcharge per line item
pub const SHIPPING_PER_ITEM: f64 = 0.5;

/// Round a currency amount to cents
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// `{prefix}-{unix millis}-{three random digits}`
pub(crate) fn reference_number(prefix: &str) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("{}-{}-{:03}", prefix, Utc::now().timestamp_millis(), suffix)
}

/// Lifecycle of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Created,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether an order in this status may move to `next`
    ///
    /// Cancelled orders are final; delivered orders can only be cancelled.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match self {
            OrderStatus::Cancelled => false,
            OrderStatus::Delivered => next == OrderStatus::Cancelled,
            _ => true,
        }
    }

    /// Orders being worked on or in transit cannot be deleted
    pub fn is_deletable(&self) -> bool {
        !matches!(self, OrderStatus::Processing | OrderStatus::Shipped)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

/// A line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub product_id: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    #[serde(default)]
    pub category: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    String::from("USA")
}

/// Money breakdown of a set of items
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub shipping_cost: f64,
    pub total: f64,
}

impl OrderTotals {
    pub fn calculate(items: &[OrderItem]) -> Self {
        let subtotal = round_currency(items.iter().map(OrderItem::line_total).sum());
        let tax = tax_for(subtotal);
        let shipping_cost = shipping_for(items.len());
        Self::from_parts(subtotal, tax, shipping_cost)
    }

    pub fn from_parts(subtotal: f64, tax: f64, shipping_cost: f64) -> Self {
        Self {
            subtotal,
            tax,
            shipping_cost,
            total: round_currency(subtotal + tax + shipping_cost),
        }
    }
}

/// Tax owed on a subtotal
pub fn tax_for(subtotal: f64) -> f64 {
    round_currency(subtotal * TAX_RATE)
}

/// Shipping for a number of line items
pub fn shipping_for(item_count: usize) -> f64 {
    round_currency(BASE_SHIPPING + SHIPPING_PER_ITEM * item_count as f64)
}

/// An order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub customer_id: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub billing_address: Option<Address>,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping_cost: f64,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// New order in `CREATED` status
    pub fn new(customer_id: impl Into<String>, items: Vec<OrderItem>, totals: OrderTotals) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_number: reference_number("ORD"),
            order_date: now,
            status: OrderStatus::Created,
            customer_id: customer_id.into(),
            customer_name: None,
            items,
            shipping_address: None,
            billing_address: None,
            payment_method: None,
            subtotal: totals.subtotal,
            tax: totals.tax,
            shipping_cost: totals.shipping_cost,
            total_amount: totals.total,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
#[path = "tests/order_tests.rs"]
mod tests;
