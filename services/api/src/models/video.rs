//! Video models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Video entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub back_img_video_url: Option<String>,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public profile of a video's uploader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOwner {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub profile_picture: Option<String>,
}

/// Video with its uploader populated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetails {
    #[serde(flatten)]
    pub video: Video,
    pub user: Option<VideoOwner>,
}

/// Request for video creation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub back_img_video_url: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Request for video update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub back_img_video_url: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Validated video creation payload
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub back_img_video_url: Option<String>,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
}
