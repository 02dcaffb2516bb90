//! Payment handlers

use actix_web::{web, HttpResponse};

use crate::dto::orders::{ProcessPaymentQuery, RefundQuery};
use crate::handlers::ApiError;
use crate::state::AppState;

use super::parse_id;

/// Handler for POST /api/payments/process?orderId&paymentMethod&amount
///
/// ## Errors
/// - 400 Bad Request: Missing parameter, unknown method or non-positive amount
/// - 404 Not Found: No such order
pub async fn process(
    state: web::Data<AppState>,
    query: web::Query<ProcessPaymentQuery>,
) -> Result<HttpResponse, ApiError> {
    let payment = state
        .payments
        .process(&query.order_id, &query.payment_method, &query.amount)
        .await
        .map_err(ApiError::api)?;
    Ok(HttpResponse::Ok().json(payment))
}

/// Handler for GET /api/payments/{id}
pub async fn get_payment(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&id, "Payment")?;
    let payment = state.payments.get(id).await.map_err(ApiError::api)?;
    Ok(HttpResponse::Ok().json(payment))
}

/// Handler for GET /api/payments/order/{order_id}
pub async fn get_by_order(
    state: web::Data<AppState>,
    order_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let payment = state
        .payments
        .get_by_order(&order_id)
        .await
        .map_err(ApiError::api)?;
    Ok(HttpResponse::Ok().json(payment))
}

/// Handler for POST /api/payments/{id}/refund?amount
///
/// Refunds the full amount when `amount` is absent.
pub async fn refund(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<RefundQuery>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&id, "Payment")?;
    let payment = state
        .payments
        .refund(id, query.amount.as_deref())
        .await
        .map_err(ApiError::api)?;
    Ok(HttpResponse::Ok().json(payment))
}
