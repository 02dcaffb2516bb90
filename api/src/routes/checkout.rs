//! Checkout handlers

use actix_web::{web, HttpResponse};
use op_core::Checkout;

use crate::dto::orders::CustomerQuery;
use crate::handlers::ApiError;
use crate::state::AppState;

use super::parse_id;

/// Handler for POST /api/checkout/initialize?customerId=
pub async fn initialize(
    state: web::Data<AppState>,
    query: web::Query<CustomerQuery>,
) -> Result<HttpResponse, ApiError> {
    let checkout = state
        .checkout
        .initialize(&query.customer_id)
        .await
        .map_err(ApiError::api)?;
    Ok(HttpResponse::Ok().json(checkout))
}

/// Handler for GET /api/checkout/{id}
pub async fn get_checkout(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&id, "Checkout")?;
    let checkout = state.checkout.get(id).await.map_err(ApiError::api)?;
    Ok(HttpResponse::Ok().json(checkout))
}

/// Handler for POST /api/checkout/process
///
/// Creates an order from the posted checkout and answers 201 with it.
pub async fn process(
    state: web::Data<AppState>,
    body: web::Json<Checkout>,
) -> Result<HttpResponse, ApiError> {
    let order = state
        .checkout
        .process(body.into_inner())
        .await
        .map_err(ApiError::api)?;
    Ok(HttpResponse::Created().json(order))
}

/// Handler for POST /api/checkout/shipping-cost
pub async fn shipping_cost(state: web::Data<AppState>, body: web::Json<Checkout>) -> HttpResponse {
    HttpResponse::Ok().json(state.checkout.shipping_cost(&body))
}

/// Handler for POST /api/checkout/tax
pub async fn tax(state: web::Data<AppState>, body: web::Json<Checkout>) -> HttpResponse {
    HttpResponse::Ok().json(state.checkout.tax(&body))
}
