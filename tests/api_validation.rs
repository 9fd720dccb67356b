// tests/api_validation.rs
//
// Requisições recusadas antes de qualquer acesso ao banco: rodam sem Postgres.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use salesops_backend::{
    handlers,
    models::auth::TokenKind,
    services::auth::issue_token,
};

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let boundary = "salesops-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn login_with_malformed_email_is_bad_request() {
    let app = salesops_backend::app(common::offline_state());

    let response = app
        .oneshot(json_request("POST", "/api/login/", json!({"email": "not-an-email", "password": "x"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["details"]["email"].is_array());
}

#[tokio::test]
async fn reset_password_requires_six_digit_otp() {
    let app = salesops_backend::app(common::offline_state());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/reset-password/",
            json!({"email": "anita@example.com", "otp": "12", "new_password": "n3w"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["details"]["otp"][0], "OTP must have exactly 6 digits.");
}

#[tokio::test]
async fn profile_without_token_is_unauthorized() {
    let app = salesops_backend::app(common::offline_state());

    let response = app
        .oneshot(Request::builder().uri("/api/profile/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_cannot_open_protected_routes() {
    let app = salesops_backend::app(common::offline_state());
    let refresh = issue_token(common::JWT_SECRET, 1, TokenKind::Refresh).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/add-rfqs/")
                .header(header::AUTHORIZATION, format!("Bearer {refresh}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn purchase_order_with_zero_quantity_is_rejected_before_persisting() {
    // Handler montado sem o guard: a recusa acontece antes do banco
    let app = Router::new()
        .route(
            "/api/purchase-orders/",
            post(handlers::purchase_order::create_purchase_order),
        )
        .with_state(common::offline_state());

    let response = app
        .oneshot(multipart_request(
            "/api/purchase-orders/",
            &[
                ("quotation", "1"),
                ("client_po_number", "PO/118"),
                ("order_type", "full"),
                ("items", r#"[{"item_name": "Gauge", "quantity": 0, "unit_price": 10}]"#),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["details"]["items"][0], "Quantity for Gauge must be at least 1.");
}

#[tokio::test]
async fn purchase_order_form_reports_every_missing_field() {
    let app = Router::new()
        .route(
            "/api/purchase-orders/",
            post(handlers::purchase_order::create_purchase_order),
        )
        .with_state(common::offline_state());

    let response = app
        .oneshot(multipart_request("/api/purchase-orders/", &[("items", "not json")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["details"]["quotation"].is_array());
    assert!(body["details"]["order_type"].is_array());
    assert!(body["details"]["items"].is_array());
}

#[tokio::test]
async fn health_reports_unreachable_database() {
    let app = salesops_backend::app(common::offline_state());

    let response = app
        .oneshot(Request::builder().uri("/api/health/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["database"], "down");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = salesops_backend::app(common::offline_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/documentation/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["paths"]["/api/quotations/send-due-reminder/"].is_object());
}
