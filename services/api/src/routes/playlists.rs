//! Playlist handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::required;
use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{CreatePlaylistRequest, MembershipChange, NewPlaylist, UpdatePlaylistRequest},
    state::AppState,
};

const PLAYLIST_NOT_FOUND: &str = "Playlist not found";
const PLAYLIST_OR_VIDEO_NOT_FOUND: &str = "Playlist or Video not found";

pub async fn create_playlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatePlaylistRequest>,
) -> ApiResult<impl IntoResponse> {
    let name = required(payload.name.as_deref(), "Name is required")?;

    let playlist = state
        .playlists
        .create(&NewPlaylist {
            name,
            description: payload.description,
            user_id: user.id,
        })
        .await?;

    info!("Playlist {} created by {}", playlist.id, user.id);
    Ok((StatusCode::CREATED, Json(playlist)))
}

pub async fn list_user_playlists(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.playlists.list_for_user(user_id).await?))
}

pub async fn get_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let playlist = state
        .playlists
        .get(playlist_id)
        .await?
        .ok_or_else(|| ApiError::not_found(PLAYLIST_NOT_FOUND))?;

    Ok(Json(playlist))
}

pub async fn update_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<Uuid>,
    Json(payload): Json<UpdatePlaylistRequest>,
) -> ApiResult<impl IntoResponse> {
    let playlist = state
        .playlists
        .update(playlist_id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found(PLAYLIST_NOT_FOUND))?;

    Ok(Json(playlist))
}

pub async fn delete_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.playlists.delete(playlist_id).await? {
        return Err(ApiError::not_found(PLAYLIST_NOT_FOUND));
    }

    Ok(Json(json!({ "message": "Playlist deleted successfully" })))
}

/// Add a video to a playlist; a second assignment of the same video is
/// reported and leaves the playlist untouched
pub async fn assign_video(
    State(state): State<AppState>,
    Path((playlist_id, video_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    if state.videos.get(video_id).await?.is_none() {
        return Err(ApiError::not_found(PLAYLIST_OR_VIDEO_NOT_FOUND));
    }

    let body = match state.playlists.add_video(playlist_id, video_id).await? {
        MembershipChange::Applied => {
            info!("Video {} added to playlist {}", video_id, playlist_id);
            json!({ "success": true, "message": "Video added to playlist" })
        }
        MembershipChange::Unchanged => {
            json!({ "success": false, "message": "Video already exists in playlist" })
        }
        MembershipChange::PlaylistNotFound => {
            return Err(ApiError::not_found(PLAYLIST_OR_VIDEO_NOT_FOUND));
        }
    };

    Ok(Json(body))
}

pub async fn remove_video(
    State(state): State<AppState>,
    Path((playlist_id, video_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    let body = match state.playlists.remove_video(playlist_id, video_id).await? {
        MembershipChange::Applied => {
            json!({ "success": true, "message": "Video removed from playlist" })
        }
        MembershipChange::Unchanged => {
            json!({ "success": false, "message": "Video not in playlist" })
        }
        MembershipChange::PlaylistNotFound => {
            return Err(ApiError::not_found(PLAYLIST_NOT_FOUND));
        }
    };

    Ok(Json(body))
}
