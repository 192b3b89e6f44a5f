//! Application state shared across handlers

use std::sync::Arc;

use common::jwt::JwtService;

use crate::repositories::{LikeStore, PlaylistStore, SubscriptionStore, VideoStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub videos: Arc<dyn VideoStore>,
    pub playlists: Arc<dyn PlaylistStore>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub likes: Arc<dyn LikeStore>,
}
