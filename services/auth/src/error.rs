//! Failures of the authentication flow
//!
//! Every auth operation returns `Result<_, AuthError>`. The HTTP status and
//! body shape are chosen here and nowhere else: business rejections travel
//! as `200 {success:false}`, token problems as `401 {msg}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::TokenError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// A mandatory field was absent or empty
    #[error("{message}")]
    MissingField {
        field: &'static str,
        message: &'static str,
    },

    /// A field was present but malformed
    #[error("{message}")]
    InvalidField {
        field: &'static str,
        message: &'static str,
    },

    /// The body was not JSON or a field had the wrong type
    #[error("Invalid request body")]
    MalformedBody,

    #[error("User already exists")]
    UserAlreadyExists,

    /// Registration could not read back the OTP it just stored
    #[error("The OTP is not valid")]
    OtpNotIssued,

    #[error("This Email does not exist")]
    EmailNotFound,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("not verified")]
    NotVerified,

    #[error("User not found.")]
    UserNotFound,

    #[error("Invalid OTP.")]
    InvalidOtp,

    #[error("User already verified")]
    AlreadyVerified,

    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken(#[source] TokenError),

    #[error("Invalid token data")]
    InvalidTokenData,

    #[error("Error signing token")]
    TokenSigning(#[source] TokenError),

    /// Any infrastructure failure during a password reset
    #[error("Error updating password.")]
    PasswordUpdate(#[source] anyhow::Error),

    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::InvalidTokenData => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::TokenSigning(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::OK,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let body = match &self {
            AuthError::MissingField { field, .. } | AuthError::InvalidField { field, .. } => {
                json!({ "message": message, "success": false, "type": field })
            }
            AuthError::MissingToken
            | AuthError::InvalidToken(_)
            | AuthError::InvalidTokenData
            | AuthError::TokenSigning(_) => json!({ "msg": message }),
            _ => json!({ "message": message, "success": false }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rejections_use_success_status() {
        assert_eq!(AuthError::UserAlreadyExists.status(), StatusCode::OK);
        assert_eq!(AuthError::IncorrectPassword.status(), StatusCode::OK);
        assert_eq!(AuthError::MalformedBody.status(), StatusCode::OK);
        assert_eq!(
            AuthError::PasswordUpdate(anyhow::anyhow!("db down")).status(),
            StatusCode::OK
        );
    }

    #[test]
    fn token_rejections_are_unauthorized() {
        assert_eq!(AuthError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidTokenData.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn infrastructure_failures_hide_details() {
        let err = AuthError::Internal(anyhow::anyhow!("connection refused"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Server error");
    }
}
