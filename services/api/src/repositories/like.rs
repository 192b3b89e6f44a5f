//! Like repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::LikeStore;
use crate::models::Like;

/// Like repository
#[derive(Clone)]
pub struct LikeRepository {
    pool: PgPool,
}

impl LikeRepository {
    /// Create a new like repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeStore for LikeRepository {
    async fn like(&self, user_id: Uuid, video_id: Uuid) -> Result<Option<Like>> {
        let like = sqlx::query_as::<_, Like>(
            r#"
            INSERT INTO likes (user_id, video_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, video_id) DO NOTHING
            RETURNING id, user_id, video_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(like)
    }

    async fn unlike(&self, user_id: Uuid, video_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND video_id = $2")
            .bind(user_id)
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_for_video(&self, video_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE video_id = $1")
            .bind(video_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn has_liked(&self, user_id: Uuid, video_id: Uuid) -> Result<bool> {
        let liked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND video_id = $2)",
        )
        .bind(user_id)
        .bind(video_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(liked)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Like>> {
        let likes = sqlx::query_as::<_, Like>(
            r#"
            SELECT id, user_id, video_id, created_at
            FROM likes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(likes)
    }
}
