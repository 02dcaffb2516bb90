//! Service-level endpoints: health, welcome and the endpoint index

use actix_web::HttpResponse;
use chrono::Utc;
use serde_json::json;

/// Handler for GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "UP",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Handler for GET /
pub async fn welcome() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to the Order Processing API",
        "version": env!("CARGO_PKG_VERSION"),
        "documentation": "/api/v1",
    }))
}

/// Handler for GET /api/status
pub async fn api_status() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "Order Processing Mock API is running!",
    }))
}

/// Handler for GET /api/v1
pub async fn api_index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Order Processing API v1",
        "endpoints": {
            "health": "/health",
            "auth": {
                "register": { "method": "POST", "path": "/api/v1/auth/register" },
                "login": { "method": "POST", "path": "/api/v1/auth/login" },
                "verify_email": { "method": "GET", "path": "/api/v1/auth/verify-email/{token}" },
                "request_password_reset": { "method": "POST", "path": "/api/v1/auth/request-password-reset" },
                "reset_password": { "method": "POST", "path": "/api/v1/auth/reset-password" },
                "refresh": { "method": "POST", "path": "/api/v1/auth/refresh" },
                "logout": { "method": "POST", "path": "/api/v1/auth/logout", "requires_auth": true }
            },
            "users": {
                "profile": { "methods": ["GET", "PUT"], "path": "/api/v1/users/profile", "requires_auth": true },
                "change_password": { "method": "POST", "path": "/api/v1/users/change-password", "requires_auth": true },
                "list": { "method": "GET", "path": "/api/v1/users", "requires_role": "admin" }
            },
            "orders": "/api/orders",
            "checkout": "/api/checkout",
            "payments": "/api/payments"
        }
    }))
}
