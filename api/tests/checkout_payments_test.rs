mod common;

use actix_web::{http::StatusCode, test};
use op_api::create_app;
use serde_json::{json, Value};

use common::harness;

fn items() -> Value {
    json!([
        { "name": "Desk", "quantity": 1, "unitPrice": 200.0 },
        { "name": "Lamp", "quantity": 2, "unitPrice": 25.0 }
    ])
}

#[actix_web::test]
async fn test_checkout_flow() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/checkout/initialize").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/checkout/initialize?customerId=cust-7")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let checkout: Value = test::read_body_json(resp).await;
    assert_eq!(checkout["customerId"], "cust-7");
    assert_eq!(checkout["items"], json!([]));

    let id = checkout["id"].as_str().unwrap();
    let fetched: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri(&format!("/api/checkout/{}", id)).to_request(),
    )
    .await;
    assert_eq!(fetched["id"], id);

    let shipping: f64 = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/checkout/shipping-cost")
            .set_json(json!({ "customerId": "cust-7", "items": items() }))
            .to_request(),
    )
    .await;
    assert_eq!(shipping, 11.0);

    let tax: f64 = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/checkout/tax")
            .set_json(json!({ "customerId": "cust-7", "items": items() }))
            .to_request(),
    )
    .await;
    assert_eq!(tax, 20.0);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/checkout/process")
            .set_json(json!({ "id": id, "customerId": "cust-7", "items": items() }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["status"], "CREATED");
    assert_eq!(order["totalAmount"], 281.0);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/checkout/process")
            .set_json(json!({ "customerId": "cust-7", "items": [] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Checkout must contain at least one item");
}

#[actix_web::test]
async fn test_payment_and_refund() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone())).await;

    let order: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/orders")
            .set_json(json!({ "customerId": "cust-3", "items": items() }))
            .to_request(),
    )
    .await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/payments/process?orderId={}&paymentMethod=CREDIT_CARD", order_id))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!(
                "/api/payments/process?orderId={}&paymentMethod=CHEQUE&amount=10",
                order_id
            ))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_PAYMENT");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!(
                "/api/payments/process?orderId={}&paymentMethod=CREDIT_CARD&amount=281",
                order_id
            ))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let payment: Value = test::read_body_json(resp).await;
    assert_eq!(payment["status"], "COMPLETED");
    assert_eq!(payment["orderId"], order_id.as_str());
    let payment_id = payment["id"].as_str().unwrap().to_string();

    let by_order: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/payments/order/{}", order_id))
            .to_request(),
    )
    .await;
    assert_eq!(by_order["id"], payment_id.as_str());

    let refunded: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/payments/{}/refund?amount=50", payment_id))
            .to_request(),
    )
    .await;
    assert_eq!(refunded["status"], "REFUNDED");
    assert_eq!(refunded["refundAmount"], 50.0);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/payments/{}/refund", payment_id))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "ALREADY_REFUNDED");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/payments/unknown").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
