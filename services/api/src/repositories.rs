//! Repositories for database operations
//!
//! Handlers depend on the store traits below. PostgreSQL implements them
//! in production, `memory` in tests.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Like, MembershipChange, NewPlaylist, NewVideo, Playlist, Subscription, UpdatePlaylistRequest,
    UpdateVideoRequest, Video, VideoDetails,
};

pub mod like;
pub mod memory;
pub mod playlist;
pub mod subscription;
pub mod video;

pub use like::LikeRepository;
pub use playlist::PlaylistRepository;
pub use subscription::SubscriptionRepository;
pub use video::VideoRepository;

#[async_trait]
pub trait VideoStore: Send + Sync {
    /// All videos, newest first
    async fn list(&self) -> Result<Vec<VideoDetails>>;

    async fn get(&self, id: Uuid) -> Result<Option<VideoDetails>>;

    async fn create(&self, new_video: &NewVideo) -> Result<Video>;

    async fn update(&self, id: Uuid, changes: &UpdateVideoRequest)
    -> Result<Option<VideoDetails>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Add one view and return the new count
    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>>;
}

#[async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn create(&self, new_playlist: &NewPlaylist) -> Result<Playlist>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Playlist>>;

    async fn get(&self, id: Uuid) -> Result<Option<Playlist>>;

    async fn update(&self, id: Uuid, changes: &UpdatePlaylistRequest) -> Result<Option<Playlist>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Append a video unless it is already a member
    async fn add_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<MembershipChange>;

    async fn remove_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<MembershipChange>;
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Returns `None` when the subscription already exists
    async fn create(&self, subscriber_id: Uuid, subscribed_to_id: Uuid)
    -> Result<Option<Subscription>>;

    async fn list_for_subscriber(&self, subscriber_id: Uuid) -> Result<Vec<Subscription>>;

    async fn find(&self, subscriber_id: Uuid, subscribed_to_id: Uuid)
    -> Result<Option<Subscription>>;

    async fn delete(&self, subscriber_id: Uuid, subscribed_to_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Returns `None` when the user already likes the video
    async fn like(&self, user_id: Uuid, video_id: Uuid) -> Result<Option<Like>>;

    async fn unlike(&self, user_id: Uuid, video_id: Uuid) -> Result<bool>;

    async fn count_for_video(&self, video_id: Uuid) -> Result<i64>;

    async fn has_liked(&self, user_id: Uuid, video_id: Uuid) -> Result<bool>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Like>>;
}
