//! Order creation input and item/address validation

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::entities::order::{Address, OrderItem};
use crate::errors::{DomainError, DomainResult};
use op_shared::validation::is_valid_zip;

/// Fields accepted when creating an order
///
/// Money fields are computed from the items when absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub billing_address: Option<Address>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub shipping_cost: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
}

/// Check every line item and give blank item ids a fresh one
pub fn validate_items(items: &mut [OrderItem]) -> DomainResult<()> {
    for (index, item) in items.iter_mut().enumerate() {
        if item.name.trim().is_empty() {
            return Err(DomainError::invalid(
                format!("items[{}].name", index),
                format!("Item {} is missing a name", index + 1),
            ));
        }
        if item.quantity == 0 {
            return Err(DomainError::invalid(
                format!("items[{}].quantity", index),
                "Quantity must be greater than zero",
            ));
        }
        if !(item.unit_price.is_finite() && item.unit_price > 0.0) {
            return Err(DomainError::invalid(
                format!("items[{}].unitPrice", index),
                "Unit price must be greater than zero",
            ));
        }
        if item.id.trim().is_empty() {
            item.id = Uuid::new_v4().to_string();
        }
    }
    Ok(())
}

pub fn validate_address(field: &str, address: &Address) -> DomainResult<()> {
    let required = [
        ("street", &address.street),
        ("city", &address.city),
        ("state", &address.state),
        ("zipCode", &address.zip_code),
    ];
    if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(DomainError::invalid(
            format!("{}.{}", field, name),
            format!("{} is required", name),
        ));
    }
    if !is_valid_zip(&address.zip_code) {
        return Err(DomainError::invalid(
            format!("{}.zipCode", field),
            "ZIP code must be 5 digits",
        ));
    }
    Ok(())
}
