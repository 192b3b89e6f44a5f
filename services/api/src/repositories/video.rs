//! Video repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use super::VideoStore;
use crate::models::{NewVideo, UpdateVideoRequest, Video, VideoDetails, VideoOwner};

const VIDEO_COLUMNS: &str = "id, title, description, video_url, back_img_video_url, user_id, \
     category_id, views, created_at, updated_at";

const DETAILS_QUERY: &str = r#"
    SELECT v.id, v.title, v.description, v.video_url, v.back_img_video_url, v.user_id,
           v.category_id, v.views, v.created_at, v.updated_at,
           u.user_name AS owner_user_name, u.email AS owner_email,
           u.profile_picture AS owner_profile_picture
    FROM videos v
    LEFT JOIN users u ON u.id = v.user_id
"#;

/// Video repository
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    /// Create a new video repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn details_from_row(row: &PgRow) -> VideoDetails {
    let video = Video {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        video_url: row.get("video_url"),
        back_img_video_url: row.get("back_img_video_url"),
        user_id: row.get("user_id"),
        category_id: row.get("category_id"),
        views: row.get("views"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    };

    let user = row
        .get::<Option<String>, _>("owner_email")
        .map(|email| VideoOwner {
            id: video.user_id,
            user_name: row.get("owner_user_name"),
            email,
            profile_picture: row.get("owner_profile_picture"),
        });

    VideoDetails { video, user }
}

#[async_trait]
impl VideoStore for VideoRepository {
    async fn list(&self) -> Result<Vec<VideoDetails>> {
        let rows = sqlx::query(&format!("{DETAILS_QUERY} ORDER BY v.created_at DESC"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(details_from_row).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<VideoDetails>> {
        let row = sqlx::query(&format!("{DETAILS_QUERY} WHERE v.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(details_from_row))
    }

    async fn create(&self, new_video: &NewVideo) -> Result<Video> {
        let video = sqlx::query_as::<_, Video>(&format!(
            r#"
            INSERT INTO videos (title, description, video_url, back_img_video_url, user_id, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(&new_video.title)
        .bind(&new_video.description)
        .bind(&new_video.video_url)
        .bind(&new_video.back_img_video_url)
        .bind(new_video.user_id)
        .bind(new_video.category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(video)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &UpdateVideoRequest,
    ) -> Result<Option<VideoDetails>> {
        let updated = sqlx::query(
            r#"
            UPDATE videos SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                video_url = COALESCE($4, video_url),
                back_img_video_url = COALESCE($5, back_img_video_url),
                category_id = COALESCE($6, category_id),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.video_url)
        .bind(&changes.back_img_video_url)
        .bind(changes.category_id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        // Likes cascade; playlist membership is an array and must be pruned.
        sqlx::query(
            r#"
            UPDATE playlists
            SET video_ids = array_remove(video_ids, $1), updated_at = NOW()
            WHERE $1 = ANY(video_ids)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>> {
        let views = sqlx::query_scalar::<_, i64>(
            "UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING views",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(views)
    }
}
