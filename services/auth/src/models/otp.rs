//! One-time passcode records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// OTP record. Several may exist per email; the newest one wins.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OtpRecord {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}
