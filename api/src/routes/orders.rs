//! Order API handlers
//!
//! Errors use the `{ error: { code, message, status, timestamp } }` body.

use actix_web::{web, HttpResponse};
use op_core::errors::OrderError;
use op_core::services::orders::{NewOrder, OrderFilter};
use op_core::OrderStatus;
use validator::Validate;

use crate::dto::orders::{OrderListQuery, StatusQuery};
use crate::dto::validation_error;
use crate::handlers::ApiError;
use crate::state::AppState;

use super::parse_id;

/// Header carrying the number of matches before paging
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Handler for GET /api/orders/status
pub async fn service_status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(state.orders.service_status())
}

/// Handler for GET /api/orders
///
/// Filters by `status` and `customerId`. Paging applies only when `page`
/// or `limit` is given; the full match count is in `X-Total-Count`.
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<OrderListQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    query
        .validate()
        .map_err(|errors| ApiError::api(validation_error(&errors)))?;

    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<OrderStatus>().map_err(|value| {
            ApiError::api(OrderError::InvalidStatus { value })
        })?),
    };
    let filter = OrderFilter {
        status,
        customer_id: query
            .customer_id
            .clone()
            .filter(|customer| !customer.trim().is_empty()),
    };

    let (orders, total) = state
        .orders
        .list(&filter, query.pagination())
        .await
        .map_err(ApiError::api)?;

    Ok(HttpResponse::Ok()
        .insert_header((TOTAL_COUNT_HEADER, total.to_string()))
        .json(orders))
}

/// Handler for GET /api/orders/{id}
pub async fn get_order(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&id, "Order")?;
    let order = state.orders.get(id).await.map_err(ApiError::api)?;
    Ok(HttpResponse::Ok().json(order))
}

/// Handler for POST /api/orders
///
/// Money fields missing from the body are computed from the items.
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<NewOrder>,
) -> Result<HttpResponse, ApiError> {
    let order = state
        .orders
        .create(body.into_inner())
        .await
        .map_err(ApiError::api)?;
    Ok(HttpResponse::Created().json(order))
}

/// Handler for PUT /api/orders/{id}/status?status=
///
/// ## Errors
/// - 400 Bad Request: Missing or unknown status
/// - 404 Not Found: No such order
/// - 409 Conflict: The current status cannot move to the requested one
pub async fn update_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&id, "Order")?;
    let order = state
        .orders
        .update_status(id, &query.status)
        .await
        .map_err(ApiError::api)?;
    Ok(HttpResponse::Ok().json(order))
}

/// Handler for DELETE /api/orders/{id}
///
/// Orders that are processing or shipped answer 409.
pub async fn delete_order(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&id, "Order")?;
    state.orders.delete(id).await.map_err(ApiError::api)?;
    Ok(HttpResponse::NoContent().finish())
}
