//! Authentication service: registration with OTP issuance, login, password
//! reset, token refresh and account verification.

pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod otp;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod validation;

pub use routes::create_router;
pub use service::AuthService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
}
