//! Playlist repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::PlaylistStore;
use crate::models::{MembershipChange, NewPlaylist, Playlist, UpdatePlaylistRequest};

const PLAYLIST_COLUMNS: &str = "id, name, description, user_id, video_ids, created_at, updated_at";

/// Playlist repository
#[derive(Clone)]
pub struct PlaylistRepository {
    pool: PgPool,
}

impl PlaylistRepository {
    /// Create a new playlist repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM playlists WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn membership_outcome(&self, rows_affected: u64, id: Uuid) -> Result<MembershipChange> {
        if rows_affected > 0 {
            Ok(MembershipChange::Applied)
        } else if self.exists(id).await? {
            Ok(MembershipChange::Unchanged)
        } else {
            Ok(MembershipChange::PlaylistNotFound)
        }
    }
}

#[async_trait]
impl PlaylistStore for PlaylistRepository {
    async fn create(&self, new_playlist: &NewPlaylist) -> Result<Playlist> {
        let playlist = sqlx::query_as::<_, Playlist>(&format!(
            r#"
            INSERT INTO playlists (name, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING {PLAYLIST_COLUMNS}
            "#
        ))
        .bind(&new_playlist.name)
        .bind(&new_playlist.description)
        .bind(new_playlist.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(playlist)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Playlist>> {
        let playlists = sqlx::query_as::<_, Playlist>(&format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(playlists)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Playlist>> {
        let playlist = sqlx::query_as::<_, Playlist>(&format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(playlist)
    }

    async fn update(&self, id: Uuid, changes: &UpdatePlaylistRequest) -> Result<Option<Playlist>> {
        let playlist = sqlx::query_as::<_, Playlist>(&format!(
            r#"
            UPDATE playlists SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PLAYLIST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(playlist)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<MembershipChange> {
        // The membership check and the append happen in one statement.
        let result = sqlx::query(
            r#"
            UPDATE playlists
            SET video_ids = array_append(video_ids, $2), updated_at = NOW()
            WHERE id = $1 AND NOT ($2 = ANY(video_ids))
            "#,
        )
        .bind(playlist_id)
        .bind(video_id)
        .execute(&self.pool)
        .await?;

        self.membership_outcome(result.rows_affected(), playlist_id)
            .await
    }

    async fn remove_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<MembershipChange> {
        let result = sqlx::query(
            r#"
            UPDATE playlists
            SET video_ids = array_remove(video_ids, $2), updated_at = NOW()
            WHERE id = $1 AND $2 = ANY(video_ids)
            "#,
        )
        .bind(playlist_id)
        .bind(video_id)
        .execute(&self.pool)
        .await?;

        self.membership_outcome(result.rows_affected(), playlist_id)
            .await
    }
}
