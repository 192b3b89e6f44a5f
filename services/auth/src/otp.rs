//! OTP generation and delivery

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, info};

use crate::models::OtpRecord;

pub const OTP_MIN: u32 = 100_000;
pub const OTP_MAX: u32 = 999_999;

/// Draw a 6-digit code uniformly from [100000, 999999]
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(OTP_MIN..=OTP_MAX).to_string()
}

/// Delivers a freshly stored OTP to its owner
#[async_trait]
pub trait OtpSender: Send + Sync {
    async fn send(&self, otp: &OtpRecord) -> Result<()>;
}

/// Delivery stand-in that only records the issuance in the log
#[derive(Debug, Clone, Default)]
pub struct TracingOtpSender;

#[async_trait]
impl OtpSender for TracingOtpSender {
    async fn send(&self, otp: &OtpRecord) -> Result<()> {
        info!(email = %otp.email, otp_id = %otp.id, "OTP issued");
        debug!(email = %otp.email, code = %otp.code, "OTP code");
        Ok(())
    }
}
