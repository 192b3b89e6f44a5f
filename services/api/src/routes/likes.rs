//! Like handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::LikeSummary,
    state::AppState,
};

pub async fn like_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if state.videos.get(video_id).await?.is_none() {
        return Err(ApiError::not_found("Video not found"));
    }

    let like = state
        .likes
        .like(user.id, video_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("Video already liked"))?;

    info!("{} liked video {}", user.id, video_id);
    Ok((StatusCode::CREATED, Json(like)))
}

pub async fn unlike_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.likes.unlike(user.id, video_id).await? {
        return Err(ApiError::not_found("Like not found"));
    }

    Ok(Json(json!({ "message": "Video unliked successfully" })))
}

/// Like count for a video and whether the caller is among the likers
pub async fn video_likes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let count = state.likes.count_for_video(video_id).await?;
    let liked = state.likes.has_liked(user.id, video_id).await?;

    Ok(Json(LikeSummary {
        video_id,
        count,
        liked,
    }))
}

pub async fn user_likes(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.likes.list_for_user(user_id).await?))
}
