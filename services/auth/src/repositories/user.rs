//! User repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::UserStore;
use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, user_name, email, password_hash, country, date_of_birth, \
     role, verified, profile_picture, created_at, updated_at";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_with_otp(&self, new_user: &NewUser, otp_code: &str) -> Result<Option<User>> {
        info!("Creating new user: {}", new_user.email);

        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (user_name, email, password_hash, country, date_of_birth)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.user_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.country)
        .bind(&new_user.date_of_birth)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user) = user else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("INSERT INTO otps (email, code) VALUES ($1, $2)")
            .bind(&user.email)
            .bind(otp_code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(user))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
                .bind(password_hash)
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_verified(&self, id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("UPDATE users SET verified = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
