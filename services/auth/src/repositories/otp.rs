//! OTP repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::OtpStore;
use crate::models::OtpRecord;

/// OTP repository
#[derive(Clone)]
pub struct OtpRepository {
    pool: PgPool,
}

impl OtpRepository {
    /// Create a new OTP repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpStore for OtpRepository {
    async fn create(&self, email: &str, code: &str) -> Result<OtpRecord> {
        let record = sqlx::query_as::<_, OtpRecord>(
            r#"
            INSERT INTO otps (email, code)
            VALUES ($1, $2)
            RETURNING id, email, code, created_at
            "#,
        )
        .bind(email)
        .bind(code)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn latest_for_email(
        &self,
        email: &str,
        issued_after: Option<DateTime<Utc>>,
    ) -> Result<Option<OtpRecord>> {
        let record = sqlx::query_as::<_, OtpRecord>(
            r#"
            SELECT id, email, code, created_at
            FROM otps
            WHERE email = $1 AND ($2::timestamptz IS NULL OR created_at >= $2)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(issued_after)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn latest_by_code(
        &self,
        code: &str,
        issued_after: Option<DateTime<Utc>>,
    ) -> Result<Option<OtpRecord>> {
        let record = sqlx::query_as::<_, OtpRecord>(
            r#"
            SELECT id, email, code, created_at
            FROM otps
            WHERE code = $1 AND ($2::timestamptz IS NULL OR created_at >= $2)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(code)
        .bind(issued_after)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn latest_for_email_and_code(
        &self,
        email: &str,
        code: &str,
        issued_after: Option<DateTime<Utc>>,
    ) -> Result<Option<OtpRecord>> {
        let record = sqlx::query_as::<_, OtpRecord>(
            r#"
            SELECT id, email, code, created_at
            FROM otps
            WHERE email = $1 AND code = $2 AND ($3::timestamptz IS NULL OR created_at >= $3)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(issued_after)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
