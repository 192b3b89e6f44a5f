//! Authentication service models

pub mod otp;
pub mod requests;
pub mod user;

// Re-export for convenience
pub use otp::OtpRecord;
pub use requests::{
    LoginRequest, RefreshTokenRequest, RegisterRequest, ResendOtpRequest, ResetPasswordRequest,
    VerifyOtpRequest,
};
pub use user::{NewUser, User};
