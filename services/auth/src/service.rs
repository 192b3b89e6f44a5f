//! Authentication flow: registration, login, password reset, token
//! refresh and account verification.
//!
//! Each operation checks its guards in order and stops at the first
//! failure, returning an [`AuthError`] that the HTTP layer renders.

use std::sync::Arc;

use common::jwt::JwtService;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    config::{OtpConfig, OtpLookupPolicy},
    error::AuthError,
    models::{
        LoginRequest, NewUser, OtpRecord, RefreshTokenRequest, RegisterRequest, ResendOtpRequest,
        ResetPasswordRequest, VerifyOtpRequest,
    },
    otp::{OtpSender, generate_otp},
    password,
    repositories::{OtpStore, UserStore},
    validation::{required, validate_email},
};

/// A successful login
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub token: String,
    /// Empty when the user has no role
    pub role: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    otps: Arc<dyn OtpStore>,
    otp_sender: Arc<dyn OtpSender>,
    jwt: JwtService,
    otp_config: OtpConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        otps: Arc<dyn OtpStore>,
        otp_sender: Arc<dyn OtpSender>,
        jwt: JwtService,
        otp_config: OtpConfig,
    ) -> Self {
        Self {
            users,
            otps,
            otp_sender,
            jwt,
            otp_config,
        }
    }

    /// Create an unverified account and issue its first OTP.
    ///
    /// Returns the id of the new user.
    pub async fn register(&self, req: RegisterRequest) -> Result<Uuid, AuthError> {
        let user_name = required(&req.user_name, "userName", "UserName is required !!")?;
        let email = required(&req.email, "email", "Email is required !!")?;
        let password = required(&req.password, "password", "Password is required !!")?;
        let country = required(&req.country, "country", "Country is required !!")?;
        let date_of_birth = required(
            &req.date_of_birth,
            "dateOfBirth",
            "Date Of Birth is required !!",
        )?;
        validate_email(email).map_err(|message| AuthError::InvalidField {
            field: "email",
            message,
        })?;

        info!("Registration attempt for {}", email);

        if self.users.find_by_email(email).await?.is_some() {
            warn!("Registration rejected, email already taken: {}", email);
            return Err(AuthError::UserAlreadyExists);
        }

        let new_user = NewUser {
            user_name: user_name.to_string(),
            email: email.to_string(),
            password_hash: password::hash_password(password)?,
            country: country.to_string(),
            date_of_birth: date_of_birth.to_string(),
        };

        // A concurrent registration may win between the check and the insert.
        let user = self
            .users
            .create_with_otp(&new_user, &generate_otp())
            .await?
            .ok_or(AuthError::UserAlreadyExists)?;

        let issued = self
            .otps
            .latest_for_email(email, self.otp_config.issued_after())
            .await?
            .ok_or(AuthError::OtpNotIssued)?;

        self.deliver(&issued).await;

        info!("User {} registered, awaiting verification", user.id);
        Ok(user.id)
    }

    /// Check credentials and mint a 24h session token
    pub async fn login(&self, req: LoginRequest) -> Result<LoginSession, AuthError> {
        let email = required(&req.email, "email", "Email is required !!")?;
        let password = required(&req.password, "password", "Password is required !!")?;

        info!("Login attempt for {}", email);

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::EmailNotFound)?;

        if !password::verify_password(password, &user.password_hash)? {
            warn!("Login rejected for {}: incorrect password", email);
            return Err(AuthError::IncorrectPassword);
        }

        if !user.verified {
            warn!("Login rejected for {}: account not verified", email);
            return Err(AuthError::NotVerified);
        }

        let token = self
            .jwt
            .issue_session_token(user.id)
            .map_err(|e| AuthError::Internal(e.into()))?;

        Ok(LoginSession {
            token,
            role: user.role.unwrap_or_default(),
        })
    }

    /// Replace a user's password once an OTP code is presented.
    ///
    /// Under the lenient policy the code is looked up on its own, so a code
    /// issued to another email is accepted. The record is left in place.
    pub async fn reset_password(&self, req: ResetPasswordRequest) -> Result<(), AuthError> {
        let email = required(&req.email, "email", "Please provide email")?;
        let code = required(&req.otp, "otp", "Please provide OTP")?;
        let new_password = required(&req.new_password, "newPassword", "Please provide newPassword")?;

        info!("Password reset attempt for {}", email);

        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(AuthError::PasswordUpdate)?
            .ok_or(AuthError::UserNotFound)?;

        let issued_after = self.otp_config.issued_after();
        let record = match self.otp_config.lookup_policy {
            OtpLookupPolicy::Lenient => self.otps.latest_by_code(code, issued_after).await,
            OtpLookupPolicy::Strict => {
                self.otps
                    .latest_for_email_and_code(email, code, issued_after)
                    .await
            }
        }
        .map_err(AuthError::PasswordUpdate)?;

        let Some(record) = record else {
            warn!("Password reset rejected for {}: invalid OTP", email);
            return Err(AuthError::InvalidOtp);
        };

        if record.email != email {
            warn!(
                "Password reset for {} authorized by an OTP issued to {}",
                email, record.email
            );
        }

        let password_hash =
            password::hash_password(new_password).map_err(AuthError::PasswordUpdate)?;
        let updated = self
            .users
            .update_password(user.id, &password_hash)
            .await
            .map_err(AuthError::PasswordUpdate)?;

        if !updated {
            return Err(AuthError::UserNotFound);
        }

        info!("Password updated for user {}", user.id);
        Ok(())
    }

    /// Exchange a still-valid token for a fresh, shorter-lived one
    pub fn refresh_token(&self, req: RefreshTokenRequest) -> Result<String, AuthError> {
        let token = req
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.jwt.validate_token(token).map_err(|e| {
            warn!("Token refresh rejected: {}", e);
            AuthError::InvalidToken(e)
        })?;

        let user_id = claims.user_id.ok_or(AuthError::InvalidTokenData)?;

        self.jwt.issue_refreshed_token(user_id).map_err(|e| {
            error!("Failed to sign refreshed token: {}", e);
            AuthError::TokenSigning(e)
        })
    }

    /// Mark an account verified when the newest OTP for its email is presented
    pub async fn verify_otp(&self, req: VerifyOtpRequest) -> Result<(), AuthError> {
        let email = required(&req.email, "email", "Please provide email")?;
        let code = required(&req.otp, "otp", "Please provide OTP")?;

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let latest = self
            .otps
            .latest_for_email(email, self.otp_config.issued_after())
            .await?;

        if latest.is_none_or(|record| record.code != code) {
            warn!("Verification rejected for {}: invalid OTP", email);
            return Err(AuthError::InvalidOtp);
        }

        if !user.verified && !self.users.mark_verified(user.id).await? {
            return Err(AuthError::UserNotFound);
        }

        info!("User {} verified", user.id);
        Ok(())
    }

    /// Issue a new OTP for an account that is still unverified
    pub async fn resend_otp(&self, req: ResendOtpRequest) -> Result<(), AuthError> {
        let email = required(&req.email, "email", "Please provide email")?;

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.verified {
            return Err(AuthError::AlreadyVerified);
        }

        let record = self.otps.create(email, &generate_otp()).await?;
        self.deliver(&record).await;
        Ok(())
    }

    async fn deliver(&self, record: &OtpRecord) {
        if let Err(e) = self.otp_sender.send(record).await {
            error!("Failed to deliver OTP to {}: {}", record.email, e);
        }
    }
}
