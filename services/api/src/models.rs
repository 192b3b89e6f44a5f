//! API models for request and response payloads

pub mod like;
pub mod playlist;
pub mod subscription;
pub mod video;

pub use like::{Like, LikeSummary};
pub use playlist::{
    CreatePlaylistRequest, MembershipChange, NewPlaylist, Playlist, UpdatePlaylistRequest,
};
pub use subscription::{CreateSubscriptionRequest, Subscription};
pub use video::{
    CreateVideoRequest, NewVideo, UpdateVideoRequest, Video, VideoDetails, VideoOwner,
};
