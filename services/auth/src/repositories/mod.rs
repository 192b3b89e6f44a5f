//! Persistence seams for the authentication flow
//!
//! The flow talks to `UserStore` and `OtpStore` only. PostgreSQL backs
//! them in production; `memory` backs them in tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{NewUser, OtpRecord, User};

pub mod memory;
pub mod otp;
pub mod user;

pub use otp::OtpRepository;
pub use user::UserRepository;

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert the user and its first OTP as one unit.
    ///
    /// Returns `None`, writing nothing, when the email is already taken.
    async fn create_with_otp(&self, new_user: &NewUser, otp_code: &str) -> Result<Option<User>>;

    /// Returns false when no user has that id
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool>;

    /// Returns false when no user has that id
    async fn mark_verified(&self, id: Uuid) -> Result<bool>;
}

/// OTP store. Lookups ignore records created before `issued_after`.
#[async_trait]
pub trait OtpStore: Send + Sync {
    async fn create(&self, email: &str, code: &str) -> Result<OtpRecord>;

    /// Most recent record issued to an email
    async fn latest_for_email(
        &self,
        email: &str,
        issued_after: Option<DateTime<Utc>>,
    ) -> Result<Option<OtpRecord>>;

    /// Most recent record carrying a code, whichever email it was issued to
    async fn latest_by_code(
        &self,
        code: &str,
        issued_after: Option<DateTime<Utc>>,
    ) -> Result<Option<OtpRecord>>;

    /// Most recent record carrying both the email and the code
    async fn latest_for_email_and_code(
        &self,
        email: &str,
        code: &str,
        issued_after: Option<DateTime<Utc>>,
    ) -> Result<Option<OtpRecord>>;
}
