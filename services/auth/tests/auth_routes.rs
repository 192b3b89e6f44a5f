//! Router-level tests for the authentication endpoints, backed by the
//! in-memory stores.

use std::sync::Arc;

use auth::{
    AppState, AuthService, config::OtpConfig, create_router, otp::TracingOtpSender,
    repositories::memory::MemoryAuthStore,
};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use common::jwt::{JwtConfig, JwtService};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn setup() -> (Router, MemoryAuthStore) {
    let store = MemoryAuthStore::new();
    let shared = Arc::new(store.clone());
    let auth_service = AuthService::new(
        shared.clone(),
        shared,
        Arc::new(TracingOtpSender),
        JwtService::new(JwtConfig::new("route-secret")).unwrap(),
        OtpConfig::default(),
    );

    (create_router(AppState { auth_service }), store)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn registration() -> Value {
    json!({
        "userName": "alice",
        "email": "alice@example.com",
        "password": "Secret#123",
        "country": "CM",
        "dateOfBirth": "1990-01-01"
    })
}

async fn register_and_verify(app: &Router, store: &MemoryAuthStore) {
    let (_, body) = post(app, "/api/auth/register", registration()).await;
    assert_eq!(body["success"], true);

    let code = store
        .otps_for("alice@example.com")
        .await
        .last()
        .unwrap()
        .code
        .clone();
    let (status, body) = post(
        app,
        "/api/auth/verify-otp",
        json!({ "email": "alice@example.com", "otp": code }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Email verified successfully.");
}

#[tokio::test]
async fn health_check_reports_ok() {
    let (app, _) = setup();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_success_shape() {
    let (app, _) = setup();
    let (status, body) = post(&app, "/api/auth/register", registration()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Send OTP successfully" })
    );
}

#[tokio::test]
async fn register_missing_field_is_tagged() {
    let (app, _) = setup();
    let mut payload = registration();
    payload.as_object_mut().unwrap().remove("dateOfBirth");

    let (status, body) = post(&app, "/api/auth/register", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["type"], "dateOfBirth");
    assert_eq!(body["message"], "Date Of Birth is required !!");
}

#[tokio::test]
async fn register_twice_reports_existing_user() {
    let (app, _) = setup();
    post(&app, "/api/auth/register", registration()).await;
    let (status, body) = post(&app, "/api/auth/register", registration()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": false, "message": "User already exists" })
    );
}

#[tokio::test]
async fn login_before_verification_fails() {
    let (app, _) = setup();
    post(&app, "/api/auth/register", registration()).await;

    let (status, body) = post(
        &app,
        "/api/auth/login",
        json!({ "email": "alice@example.com", "password": "Secret#123" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": false, "message": "not verified" }));
}

#[tokio::test]
async fn login_then_refresh() {
    let (app, store) = setup();
    register_and_verify(&app, &store).await;

    let (status, body) = post(
        &app,
        "/api/auth/login",
        json!({ "email": "alice@example.com", "password": "Secret#123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["Role"], "");
    let token = body["Token"].as_str().unwrap().to_string();

    let (status, body) = post(&app, "/api/auth/refresh-token", json!({ "token": token })).await;
    assert_eq!(status, StatusCode::OK);

    let jwt = JwtService::new(JwtConfig::new("route-secret")).unwrap();
    let original = jwt.validate_token(&token).unwrap();
    let renewed = jwt.validate_token(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(renewed.user_id, original.user_id);
    assert!(renewed.lifetime() < original.lifetime());
}

#[tokio::test]
async fn refresh_failures_are_unauthorized() {
    let (app, _) = setup();

    let (status, body) = post(&app, "/api/auth/refresh-token", json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "msg": "No token provided" }));

    let (status, body) = post(
        &app,
        "/api/auth/refresh-token",
        json!({ "token": "not.a.token" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "msg": "Invalid token" }));
}

#[tokio::test]
async fn forget_password_then_login_with_new_password() {
    let (app, store) = setup();
    register_and_verify(&app, &store).await;
    let code = store
        .otps_for("alice@example.com")
        .await
        .last()
        .unwrap()
        .code
        .clone();

    let (status, body) = post(
        &app,
        "/api/auth/forget-password",
        json!({ "email": "alice@example.com", "otp": code, "newPassword": "Brand#New1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Password updated successfully." })
    );

    let (_, body) = post(
        &app,
        "/api/auth/login",
        json!({ "email": "alice@example.com", "password": "Brand#New1" }),
    )
    .await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn forget_password_missing_field() {
    let (app, _) = setup();
    let (status, body) = post(
        &app,
        "/api/auth/forget-password",
        json!({ "email": "alice@example.com", "otp": "123456" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "newPassword");
    assert_eq!(body["message"], "Please provide newPassword");
}

#[tokio::test]
async fn wrongly_typed_field_is_a_business_rejection() {
    let (app, store) = setup();
    let (status, body) = post(
        &app,
        "/api/auth/register",
        json!({ "userName": "alice", "email": 5, "password": "Secret#123" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid request body");
    assert_eq!(store.user_count().await, 0);
}

#[tokio::test]
async fn non_json_body_is_a_business_rejection() {
    let (app, _) = setup();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .body(Body::from("email=alice@example.com"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}
