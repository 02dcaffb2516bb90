use serde::Deserialize;
use validator::Validate;

use op_shared::Pagination;

/// `GET /api/orders` query
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub status: Option<String>,
    pub customer_id: Option<String>,
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

impl OrderListQuery {
    /// Paging only applies when the client asked for it
    pub fn pagination(&self) -> Option<Pagination> {
        match (self.page, self.limit) {
            (None, None) => None,
            (page, limit) => Some(Pagination::from_query(page, limit)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    #[serde(default)]
    pub customer_id: String,
}

/// Payment parameters arrive as raw strings so the service can report
/// which one is missing or malformed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentQuery {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefundQuery {
    pub amount: Option<String>,
}
