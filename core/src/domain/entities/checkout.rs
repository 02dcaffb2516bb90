//! Checkout session collected before an order is placed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::{Address, OrderItem};

/// A checkout in progress
///
/// Money fields left at zero are computed when the checkout is processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub billing_address: Option<Address>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub shipping_cost: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Checkout {
    /// An empty checkout for a customer
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: customer_id.into(),
            items: Vec::new(),
            shipping_address: None,
            billing_address: None,
            payment_method: None,
            subtotal: 0.0,
            tax: 0.0,
            shipping_cost: 0.0,
            total: 0.0,
            created_at: Utc::now(),
        }
    }
}
