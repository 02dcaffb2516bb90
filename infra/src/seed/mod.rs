//! Mock order and payment data for demos and local development

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use op_core::domain::entities::order::{Address, Order, OrderItem, OrderStatus, OrderTotals};
use op_core::domain::entities::payment::{Payment, PaymentMethod, PaymentStatus};
use op_core::errors::DomainResult;
use op_core::repositories::{OrderRepository, PaymentRepository};

const PRODUCTS: [(&str, &str, f64); 10] = [
    ("Laptop", "Electronics", 999.99),
    ("Smartphone", "Electronics", 699.99),
    ("Headphones", "Electronics", 149.99),
    ("T-shirt", "Clothing", 19.99),
    ("Jeans", "Clothing", 49.99),
    ("Sneakers", "Footwear", 89.99),
    ("Coffee Maker", "Home", 79.99),
    ("Blender", "Home", 39.99),
    ("Book", "Books", 14.99),
    ("Watch", "Accessories", 199.99),
];

const STREETS: [&str; 5] = ["Main St", "Oak Ave", "Maple Rd", "Washington Blvd", "Park Lane"];
const CITIES: [(&str, &str); 5] = [
    ("New York", "NY"),
    ("Los Angeles", "CA"),
    ("Chicago", "IL"),
    ("Houston", "TX"),
    ("Phoenix", "AZ"),
];
const FIRST_NAMES: [&str; 6] = ["John", "Jane", "Michael", "Emily", "David", "Sarah"];
const LAST_NAMES: [&str; 6] = ["Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia"];

fn pick<'a, T, R: Rng>(rng: &mut R, values: &'a [T]) -> &'a T {
    // every table above is non-empty
    &values[rng.gen_range(0..values.len())]
}

fn mock_address<R: Rng>(rng: &mut R) -> Address {
    let (city, state) = *pick(rng, &CITIES);
    Address {
        street: format!("{} {}", rng.gen_range(100..1000), pick(rng, &STREETS)),
        city: city.to_string(),
        state: state.to_string(),
        zip_code: rng.gen_range(10_000..100_000).to_string(),
        country: "USA".to_string(),
    }
}

fn mock_item<R: Rng>(rng: &mut R) -> OrderItem {
    let (name, category, unit_price) = *pick(rng, &PRODUCTS);
    OrderItem {
        id: Uuid::new_v4().to_string(),
        product_id: Some(format!("PROD-{}", name.to_uppercase().replace(' ', "-"))),
        name: name.to_string(),
        quantity: rng.gen_range(1..=5),
        unit_price,
        category: Some(category.to_string()),
    }
}

/// `count` orders for random customers, dated within the last 30 days
pub fn generate_mock_orders(count: usize) -> Vec<Order> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let items: Vec<OrderItem> = (0..rng.gen_range(1..=5)).map(|_| mock_item(&mut rng)).collect();
            let totals = OrderTotals::calculate(&items);
            let address = mock_address(&mut rng);
            let customer_name = format!("{} {}", pick(&mut rng, &FIRST_NAMES), pick(&mut rng, &LAST_NAMES));

            let mut order = Order::new(Uuid::new_v4().to_string(), items, totals);
            let placed = Utc::now() - Duration::days(rng.gen_range(0..=30)) - Duration::minutes(rng.gen_range(0..1440));
            order.order_date = placed;
            order.created_at = placed;
            order.updated_at = placed;
            order.status = *pick(&mut rng, &OrderStatus::ALL);
            order.customer_name = Some(customer_name);
            order.shipping_address = Some(address.clone());
            order.billing_address = Some(address);
            order
        })
        .collect()
}

/// One payment for every order that is not cancelled
pub fn generate_mock_payments(orders: &[Order]) -> Vec<Payment> {
    let mut rng = rand::thread_rng();
    let methods = [
        PaymentMethod::CreditCard,
        PaymentMethod::Paypal,
        PaymentMethod::BankTransfer,
    ];
    orders
        .iter()
        .filter(|order| order.status != OrderStatus::Cancelled)
        .map(|order| {
            let method = *methods.choose(&mut rng).unwrap_or(&PaymentMethod::CreditCard);
            let mut payment = Payment::completed(order.id.to_string(), method, order.total_amount);
            payment.payment_date = order.order_date + Duration::minutes(rng.gen_range(1..60));
            if order.status == OrderStatus::Created && rng.gen_bool(0.3) {
                payment.status = PaymentStatus::Pending;
            }
            payment
        })
        .collect()
}

/// Seed orders and payments when no orders exist yet
///
/// # Returns
/// Number of orders created; zero when data was already present
pub async fn seed_if_empty(
    orders: &dyn OrderRepository,
    payments: &dyn PaymentRepository,
    count: usize,
) -> DomainResult<usize> {
    if !orders.list().await?.is_empty() {
        info!("Orders already present, skipping mock data");
        return Ok(0);
    }

    let generated = generate_mock_orders(count);
    for payment in generate_mock_payments(&generated) {
        payments.create(payment).await?;
    }
    for order in generated {
        orders.create(order).await?;
    }

    info!(count, "Seeded mock orders");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use op_core::repositories::{InMemoryOrderRepository, InMemoryPaymentRepository};
    use op_shared::validation::is_valid_zip;

    #[test]
    fn test_generated_orders_are_consistent() {
        for order in generate_mock_orders(25) {
            assert!((1..=5).contains(&order.items.len()));
            assert!(order.items.iter().all(|item| (1..=5).contains(&item.quantity)));
            assert_eq!(
                OrderTotals::calculate(&order.items).total,
                order.total_amount
            );
            let address = order.shipping_address.unwrap();
            assert!(is_valid_zip(&address.zip_code));
            assert!(order.order_date <= Utc::now());
        }
    }

    #[test]
    fn test_payments_reference_orders() {
        let orders = generate_mock_orders(10);
        let payments = generate_mock_payments(&orders);
        let expected = orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .count();
        assert_eq!(payments.len(), expected);
        for payment in payments {
            let order = orders
                .iter()
                .find(|o| o.id.to_string() == payment.order_id)
                .unwrap();
            assert_eq!(payment.amount, order.total_amount);
        }
    }

    #[tokio::test]
    async fn test_seed_only_once() {
        let orders = InMemoryOrderRepository::new();
        let payments = InMemoryPaymentRepository::new();

        assert_eq!(seed_if_empty(&orders, &payments, 5).await.unwrap(), 5);
        assert_eq!(seed_if_empty(&orders, &payments, 5).await.unwrap(), 0);
        assert_eq!(orders.list().await.unwrap().len(), 5);
    }
}
