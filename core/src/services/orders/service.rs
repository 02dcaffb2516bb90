use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::order::{Order, OrderStatus, OrderTotals};
use crate::errors::{DomainError, DomainResult, OrderError};
use crate::repositories::OrderRepository;
use op_shared::Pagination;

use super::input::{validate_address, validate_items, NewOrder};

/// Text returned by the order service health probe
pub const SERVICE_STATUS: &str = "Order Processing Service is running!";

/// Narrowing applied when listing orders
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<String>,
}

impl OrderFilter {
    fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |status| order.status == status)
            && self
                .customer_id
                .as_deref()
                .map_or(true, |customer| order.customer_id == customer)
    }
}

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub fn service_status(&self) -> &'static str {
        SERVICE_STATUS
    }

    /// Matching orders, newest first, plus the number of matches
    ///
    /// Without a pagination every match is returned.
    pub async fn list(
        &self,
        filter: &OrderFilter,
        pagination: Option<Pagination>,
    ) -> DomainResult<(Vec<Order>, usize)> {
        let mut orders: Vec<Order> = self
            .orders
            .list()
            .await?
            .into_iter()
            .filter(|order| filter.matches(order))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = orders.len();
        let orders = match pagination {
            Some(pagination) => pagination.apply(orders),
            None => orders,
        };
        Ok((orders, total))
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order"))
    }

    pub async fn create(&self, input: NewOrder) -> DomainResult<Order> {
        let customer_id = input
            .customer_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        let (customer_id, mut items) = match (customer_id, input.items) {
            (Some(customer_id), items) if !items.is_empty() => (customer_id, items),
            _ => {
                return Err(DomainError::invalid(
                    "order",
                    "Customer ID and items are required",
                ))
            }
        };

        validate_items(&mut items)?;
        if let Some(address) = &input.shipping_address {
            validate_address("shippingAddress", address)?;
        }

        let computed = OrderTotals::calculate(&items);
        let totals = match input.total_amount {
            Some(total) if total > 0.0 => OrderTotals {
                subtotal: input.subtotal.unwrap_or(computed.subtotal),
                tax: input.tax.unwrap_or(computed.tax),
                shipping_cost: input.shipping_cost.unwrap_or(computed.shipping_cost),
                total,
            },
            _ => OrderTotals::from_parts(
                input.subtotal.unwrap_or(computed.subtotal),
                input.tax.unwrap_or(computed.tax),
                input.shipping_cost.unwrap_or(computed.shipping_cost),
            ),
        };

        let mut order = Order::new(customer_id, items, totals);
        order.customer_name = input.customer_name;
        order.shipping_address = input.shipping_address;
        order.billing_address = input.billing_address;
        order.payment_method = input.payment_method;

        let order = self.orders.create(order).await?;
        info!(order_id = %order.id, order_number = %order.order_number, total = order.total_amount, "Order created");
        Ok(order)
    }

    /// Move an order to a new status
    ///
    /// # Returns
    ///
    /// * `Err(OrderError::InvalidStatus)` - Unknown status name
    /// * `Err(OrderError::InvalidTransition)` - Not allowed from the current status
    pub async fn update_status(&self, id: Uuid, raw_status: &str) -> DomainResult<Order> {
        if raw_status.trim().is_empty() {
            return Err(DomainError::invalid("status", "Status is required"));
        }
        let status: OrderStatus = raw_status
            .parse()
            .map_err(|value| OrderError::InvalidStatus { value })?;

        let order = self
            .orders
            .modify(
                id,
                Box::new(move |order: &mut Order| -> DomainResult<()> {
                    if !order.status.can_transition_to(status) {
                        return Err(OrderError::InvalidTransition {
                            from: order.status.to_string(),
                            to: status.to_string(),
                        }
                        .into());
                    }
                    order.set_status(status);
                    Ok(())
                }),
            )
            .await?;
        info!(order_id = %order.id, to = %status, "Order status changed");
        Ok(order)
    }

    /// Remove an order unless it is being processed or shipped
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let deleted = self
            .orders
            .delete_if(
                id,
                Box::new(|order: &Order| -> DomainResult<()> {
                    if order.status.is_deletable() {
                        Ok(())
                    } else {
                        Err(OrderError::NotDeletable {
                            status: order.status.to_string(),
                        }
                        .into())
                    }
                }),
            )
            .await?;
        if !deleted {
            return Err(DomainError::not_found("Order"));
        }
        info!(order_id = %id, "Order deleted");
        Ok(())
    }
}
