//! Video handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::required;
use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{CreateVideoRequest, NewVideo, UpdateVideoRequest},
    state::AppState,
};

const VIDEO_NOT_FOUND: &str = "Video not found";

/// All videos, newest first, with their uploader
pub async fn list_videos(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let videos = state.videos.list().await?;
    Ok(Json(videos))
}

pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let video = state
        .videos
        .get(video_id)
        .await?
        .ok_or_else(|| ApiError::not_found(VIDEO_NOT_FOUND))?;

    Ok(Json(video))
}

/// Publish a video owned by the caller
pub async fn create_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateVideoRequest>,
) -> ApiResult<impl IntoResponse> {
    let title = required(payload.title.as_deref(), "Title is required")?;
    let video_url = required(payload.video_url.as_deref(), "Video URL is required")?;

    let video = state
        .videos
        .create(&NewVideo {
            title,
            description: payload.description,
            video_url,
            back_img_video_url: payload.back_img_video_url,
            user_id: user.id,
            category_id: payload.category_id,
        })
        .await?;

    info!("Video {} created by {}", video.id, user.id);
    Ok((StatusCode::CREATED, Json(video)))
}

pub async fn update_video(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
    Json(payload): Json<UpdateVideoRequest>,
) -> ApiResult<impl IntoResponse> {
    let video = state
        .videos
        .update(video_id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found(VIDEO_NOT_FOUND))?;

    Ok(Json(video))
}

pub async fn delete_video(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.videos.delete(video_id).await? {
        warn!("Delete requested for unknown video {}", video_id);
        return Err(ApiError::not_found(VIDEO_NOT_FOUND));
    }

    info!("Video {} deleted", video_id);
    Ok(Json(json!({ "message": "Video deleted successfully" })))
}

/// Count one view
pub async fn add_view(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state
        .videos
        .increment_views(video_id)
        .await?
        .ok_or_else(|| ApiError::not_found(VIDEO_NOT_FOUND))?;

    Ok(Json(json!({ "message": "Add view video" })))
}
