//! Service configuration loaded once at startup

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use common::jwt::JwtConfig;
use std::str::FromStr;

const DEFAULT_OTP_TTL_SECONDS: i64 = 300;

/// How a password reset matches the submitted OTP code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtpLookupPolicy {
    /// Any live record carrying the code authorizes the reset, whatever its email
    #[default]
    Lenient,
    /// The record must carry both the code and the account's email
    Strict,
}

impl FromStr for OtpLookupPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => anyhow::bail!("unknown OTP lookup policy: {}", other),
        }
    }
}

/// OTP configuration
#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub lookup_policy: OtpLookupPolicy,
    /// Records older than this are ignored; `None` keeps them forever
    pub ttl: Option<Duration>,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            lookup_policy: OtpLookupPolicy::Lenient,
            ttl: Some(Duration::seconds(DEFAULT_OTP_TTL_SECONDS)),
        }
    }
}

impl OtpConfig {
    /// Create a new OtpConfig from environment variables
    ///
    /// # Environment Variables
    /// - `OTP_LOOKUP_POLICY`: `lenient` or `strict` (default: lenient)
    /// - `OTP_TTL_SECONDS`: lifetime of an OTP record, `0` disables expiry (default: 300)
    pub fn from_env() -> Result<Self> {
        let lookup_policy = match std::env::var("OTP_LOOKUP_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => OtpLookupPolicy::default(),
        };

        let ttl = match std::env::var("OTP_TTL_SECONDS") {
            Ok(value) => parse_ttl(&value)?,
            Err(_) => Some(Duration::seconds(DEFAULT_OTP_TTL_SECONDS)),
        };

        Ok(Self { lookup_policy, ttl })
    }

    /// Oldest creation time a record may have to still count
    pub fn issued_after(&self) -> Option<DateTime<Utc>> {
        self.ttl.and_then(|ttl| Utc::now().checked_sub_signed(ttl))
    }
}

/// `0` disables expiry; anything that cannot be subtracted from the
/// current time is rejected
fn parse_ttl(value: &str) -> Result<Option<Duration>> {
    let seconds: i64 = value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid OTP_TTL_SECONDS {:?}: {}", value, e))?;

    if seconds < 0 {
        anyhow::bail!("OTP_TTL_SECONDS must not be negative: {}", seconds);
    }
    if seconds == 0 {
        return Ok(None);
    }

    let ttl = Duration::try_seconds(seconds)
        .ok_or_else(|| anyhow::anyhow!("OTP_TTL_SECONDS out of range: {}", seconds))?;
    Utc::now()
        .checked_sub_signed(ttl)
        .ok_or_else(|| anyhow::anyhow!("OTP_TTL_SECONDS out of range: {}", seconds))?;

    Ok(Some(ttl))
}

/// Authentication service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Address the HTTP server binds to
    pub server_addr: String,
    pub jwt: JwtConfig,
    pub otp: OtpConfig,
}

impl AuthConfig {
    /// Create a new AuthConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SERVER_ADDR`: bind address (default: 0.0.0.0:3000)
    /// - see [`JwtConfig::from_env`] and [`OtpConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        let server_addr =
            std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            server_addr,
            jwt: JwtConfig::from_env()?,
            otp: OtpConfig::from_env()?,
        })
    }
}
