//! Payment records against orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::reference_number;

/// Supported payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
    Crypto,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Paypal,
        PaymentMethod::BankTransfer,
        PaymentMethod::Crypto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::DebitCard => "DEBIT_CARD",
            PaymentMethod::Paypal => "PAYPAL",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Crypto => "CRYPTO",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

/// A payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub order_id: String,
    /// `TXN-{unix millis}-{three random digits}`
    pub transaction_id: String,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
    #[serde(default)]
    pub refund_amount: Option<f64>,
    #[serde(default)]
    pub refund_date: Option<DateTime<Utc>>,
}

impl Payment {
    /// A settled payment
    pub fn completed(order_id: impl Into<String>, payment_method: PaymentMethod, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: order_id.into(),
            transaction_id: reference_number("TXN"),
            payment_method,
            amount,
            status: PaymentStatus::Completed,
            payment_date: Utc::now(),
            refund_amount: None,
            refund_date: None,
        }
    }

    pub fn refund(&mut self, amount: f64) {
        self.status = PaymentStatus::Refunded;
        self.refund_amount = Some(amount);
        self.refund_date = Some(Utc::now());
    }
}
