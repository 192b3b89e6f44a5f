//! API service routes

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

mod likes;
mod playlists;
mod subscriptions;
mod videos;

/// Create the router for the API service
///
/// Reading videos and counting views is public. Every other route
/// requires a bearer token.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/videos", get(videos::list_videos))
        .route("/api/videos/:videoId", get(videos::get_video))
        .route("/api/videos/:videoId/view", put(videos::add_view));

    let protected_routes = Router::new()
        .route("/api/videos", post(videos::create_video))
        .route(
            "/api/videos/:videoId",
            put(videos::update_video).delete(videos::delete_video),
        )
        .route("/api/playlists", post(playlists::create_playlist))
        .route(
            "/api/playlists/user/:userId",
            get(playlists::list_user_playlists),
        )
        .route(
            "/api/playlists/:playlistId",
            get(playlists::get_playlist)
                .put(playlists::update_playlist)
                .delete(playlists::delete_playlist),
        )
        .route(
            "/api/playlists/:playlistId/videos/:videoId",
            post(playlists::assign_video).delete(playlists::remove_video),
        )
        .route(
            "/api/subscriptions",
            post(subscriptions::create_subscription),
        )
        .route(
            "/api/subscriptions/:subscriberId",
            get(subscriptions::list_subscriptions),
        )
        .route(
            "/api/subscriptions/:subscriberId/:subscribedToId",
            get(subscriptions::check_subscription).delete(subscriptions::delete_subscription),
        )
        .route(
            "/api/likes/:videoId",
            post(likes::like_video).delete(likes::unlike_video),
        )
        .route("/api/likes/video/:videoId", get(likes::video_likes))
        .route("/api/likes/user/:userId", get(likes::user_likes))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Presence check for a mandatory body field; blank counts as missing
fn required(value: Option<&str>, message: &str) -> crate::error::ApiResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(crate::error::ApiError::bad_request(message)),
    }
}
