use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use skincare_storefront::{routes::create_app, state::AppState};

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

#[tokio::test]
async fn catalog_is_public_and_filterable() {
    let app = create_app(AppState::in_memory().expect("state"));

    let (status, body) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["meta"]["total"], 5);

    let (_, body) = send(&app, Method::GET, "/api/products?q=vitamin&sort_by=price", None).await;
    let items = body["data"]["items"].as_array().expect("items");
    assert!(items.iter().all(|p| p["name"].as_str().unwrap_or_default().to_lowercase().contains("vitamin")
        || p["brand"].as_str().unwrap_or_default().to_lowercase().contains("vitamin")));

    let (status, _) = send(&app, Method::GET, "/api/products/prod-404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/nope");
}

#[tokio::test]
async fn session_gates_orders_and_admin_routes() {
    let app = create_app(AppState::in_memory().expect("state"));

    let (status, body) = send(&app, Method::GET, "/api/auth/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let (status, _) = send(&app, Method::GET, "/api/orders", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "customer@example.com", "password": "bad" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "customer@example.com", "password": "customer123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["redirect"], "/");
    assert_eq!(body["data"]["user"]["role"], "customer");

    let (status, _) = send(&app, Method::GET, "/api/admin/stats", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::POST, "/api/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, "/api/orders", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn checkout_and_illegal_status_change_over_http() {
    let app = create_app(AppState::in_memory().expect("state"));

    send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "customer@example.com", "password": "customer123" })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/cart",
        Some(json!({ "productId": "prod-2", "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 2);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders/checkout",
        Some(json!({
            "shippingAddress": {
                "name": "John Doe",
                "phone": "9876543210",
                "address": "1 Park Street",
                "city": "Kolkata",
                "state": "WB",
                "pincode": "700016"
            },
            "paymentMethod": "cod"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1198.0);
    assert_eq!(body["data"]["status"], "pending");
    let order_id = body["data"]["id"].as_str().expect("order id").to_string();

    let (_, body) = send(&app, Method::GET, "/api/cart/count", None).await;
    assert_eq!(body["data"]["count"], 0);

    send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "admin@skincare.com", "password": "admin123" })),
    )
    .await;

    let status_uri = format!("/api/admin/orders/{order_id}/status");
    let (status, _) = send(
        &app,
        Method::PATCH,
        &status_uri,
        Some(json!({ "status": "delivered" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &status_uri,
        Some(json!({ "status": "processing" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "processing");
}

#[tokio::test]
async fn out_of_range_input_is_rejected_not_fatal() {
    let app = create_app(AppState::in_memory().expect("state"));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/products?page=9223372036854775807&per_page=100",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["meta"]["total"], 5);

    for _ in 0..3 {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/cart",
            Some(json!({ "productId": "prod-1", "quantity": 2147483647 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    let (_, body) = send(&app, Method::GET, "/api/cart/count", None).await;
    assert_eq!(body["data"]["count"], 0);
}

#[tokio::test]
async fn fractional_prices_are_accepted_and_listed() {
    let app = create_app(AppState::in_memory().expect("state"));
    send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "admin@skincare.com", "password": "admin123" })),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/products/prod-1",
        Some(json!({ "price": 249.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(body["meta"]["total"], 5);
    assert_eq!(body["data"]["items"][0]["price"], 249.5);
}
