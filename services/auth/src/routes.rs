//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;

use crate::{
    AppState,
    error::AuthError,
    extract::AuthJson,
    models::{
        LoginRequest, RefreshTokenRequest, RegisterRequest, ResendOtpRequest,
        ResetPasswordRequest, VerifyOtpRequest,
    },
};

/// Generic `{success, message}` body
#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    fn ok(message: &'static str) -> Json<Self> {
        Json(Self {
            success: true,
            message,
        })
    }
}

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(rename = "Token")]
    pub token: String,
    #[serde(rename = "Role")]
    pub role: String,
    pub message: &'static str,
    pub success: bool,
}

/// Response for token refresh
#[derive(Serialize)]
pub struct RefreshTokenResponse {
    pub token: String,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/forget-password", post(forget_password))
        .route("/api/auth/refresh-token", post(refresh_token))
        .route("/api/auth/verify-otp", post(verify_otp))
        .route("/api/auth/resend-otp", post(resend_otp))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    AuthJson(payload): AuthJson<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    state.auth_service.register(payload).await?;
    Ok(MessageResponse::ok("Send OTP successfully"))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    AuthJson(payload): AuthJson<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let session = state.auth_service.login(payload).await?;

    Ok(Json(LoginResponse {
        token: session.token,
        role: session.role,
        message: "Login successful",
        success: true,
    }))
}

/// Password reset endpoint
pub async fn forget_password(
    State(state): State<AppState>,
    AuthJson(payload): AuthJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AuthError> {
    state.auth_service.reset_password(payload).await?;
    Ok(MessageResponse::ok("Password updated successfully."))
}

/// Refresh token endpoint
pub async fn refresh_token(
    State(state): State<AppState>,
    AuthJson(payload): AuthJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let token = state.auth_service.refresh_token(payload)?;
    Ok(Json(RefreshTokenResponse { token }))
}

/// Account verification endpoint
pub async fn verify_otp(
    State(state): State<AppState>,
    AuthJson(payload): AuthJson<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AuthError> {
    state.auth_service.verify_otp(payload).await?;
    Ok(MessageResponse::ok("Email verified successfully."))
}

/// OTP resend endpoint
pub async fn resend_otp(
    State(state): State<AppState>,
    AuthJson(payload): AuthJson<ResendOtpRequest>,
) -> Result<impl IntoResponse, AuthError> {
    state.auth_service.resend_otp(payload).await?;
    Ok(MessageResponse::ok("Send OTP successfully"))
}
