//! In-memory resource store
//!
//! Mirrors the Postgres behaviour closely enough for router tests: likes
//! follow their video on delete, duplicate pairs are rejected and video
//! owners are populated from the registered user profiles.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{LikeStore, PlaylistStore, SubscriptionStore, VideoStore};
use crate::models::{
    Like, MembershipChange, NewPlaylist, NewVideo, Playlist, Subscription, UpdatePlaylistRequest,
    UpdateVideoRequest, Video, VideoDetails, VideoOwner,
};

#[derive(Default)]
struct Tables {
    owners: HashMap<Uuid, VideoOwner>,
    videos: HashMap<Uuid, Video>,
    playlists: HashMap<Uuid, Playlist>,
    subscriptions: Vec<Subscription>,
    likes: Vec<Like>,
}

impl Tables {
    fn details(&self, video: &Video) -> VideoDetails {
        VideoDetails {
            video: video.clone(),
            user: self.owners.get(&video.user_id).cloned(),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user profile so that their videos show an owner
    pub async fn add_user(&self, user_name: &str, email: &str) -> Uuid {
        let owner = VideoOwner {
            id: Uuid::new_v4(),
            user_name: user_name.to_string(),
            email: email.to_string(),
            profile_picture: None,
        };
        let id = owner.id;
        self.tables.lock().await.owners.insert(id, owner);
        id
    }
}

#[async_trait]
impl VideoStore for MemoryStore {
    async fn list(&self) -> Result<Vec<VideoDetails>> {
        let tables = self.tables.lock().await;
        let mut videos: Vec<&Video> = tables.videos.values().collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos.into_iter().map(|v| tables.details(v)).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<VideoDetails>> {
        let tables = self.tables.lock().await;
        Ok(tables.videos.get(&id).map(|v| tables.details(v)))
    }

    async fn create(&self, new_video: &NewVideo) -> Result<Video> {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            title: new_video.title.clone(),
            description: new_video.description.clone(),
            video_url: new_video.video_url.clone(),
            back_img_video_url: new_video.back_img_video_url.clone(),
            user_id: new_video.user_id,
            category_id: new_video.category_id,
            views: 0,
            created_at: now,
            updated_at: now,
        };

        self.tables
            .lock()
            .await
            .videos
            .insert(video.id, video.clone());
        Ok(video)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &UpdateVideoRequest,
    ) -> Result<Option<VideoDetails>> {
        let mut tables = self.tables.lock().await;
        let Some(video) = tables.videos.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            video.title = title.clone();
        }
        if let Some(description) = &changes.description {
            video.description = Some(description.clone());
        }
        if let Some(video_url) = &changes.video_url {
            video.video_url = video_url.clone();
        }
        if let Some(back_img) = &changes.back_img_video_url {
            video.back_img_video_url = Some(back_img.clone());
        }
        if let Some(category_id) = changes.category_id {
            video.category_id = Some(category_id);
        }
        video.updated_at = Utc::now();

        let video = video.clone();
        Ok(Some(tables.details(&video)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        if tables.videos.remove(&id).is_none() {
            return Ok(false);
        }
        tables.likes.retain(|l| l.video_id != id);
        for playlist in tables.playlists.values_mut() {
            playlist.video_ids.retain(|video_id| *video_id != id);
        }
        Ok(true)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.videos.get_mut(&id).map(|video| {
            video.views += 1;
            video.views
        }))
    }
}

#[async_trait]
impl PlaylistStore for MemoryStore {
    async fn create(&self, new_playlist: &NewPlaylist) -> Result<Playlist> {
        let now = Utc::now();
        let playlist = Playlist {
            id: Uuid::new_v4(),
            name: new_playlist.name.clone(),
            description: new_playlist.description.clone(),
            user_id: new_playlist.user_id,
            video_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.tables
            .lock()
            .await
            .playlists
            .insert(playlist.id, playlist.clone());
        Ok(playlist)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Playlist>> {
        let tables = self.tables.lock().await;
        let mut playlists: Vec<Playlist> = tables
            .playlists
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        playlists.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(playlists)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Playlist>> {
        Ok(self.tables.lock().await.playlists.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, changes: &UpdatePlaylistRequest) -> Result<Option<Playlist>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.playlists.get_mut(&id).map(|playlist| {
            if let Some(name) = &changes.name {
                playlist.name = name.clone();
            }
            if let Some(description) = &changes.description {
                playlist.description = Some(description.clone());
            }
            playlist.updated_at = Utc::now();
            playlist.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.tables.lock().await.playlists.remove(&id).is_some())
    }

    async fn add_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<MembershipChange> {
        let mut tables = self.tables.lock().await;
        let Some(playlist) = tables.playlists.get_mut(&playlist_id) else {
            return Ok(MembershipChange::PlaylistNotFound);
        };

        if playlist.video_ids.contains(&video_id) {
            return Ok(MembershipChange::Unchanged);
        }
        playlist.video_ids.push(video_id);
        playlist.updated_at = Utc::now();
        Ok(MembershipChange::Applied)
    }

    async fn remove_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<MembershipChange> {
        let mut tables = self.tables.lock().await;
        let Some(playlist) = tables.playlists.get_mut(&playlist_id) else {
            return Ok(MembershipChange::PlaylistNotFound);
        };

        let before = playlist.video_ids.len();
        playlist.video_ids.retain(|id| *id != video_id);
        if playlist.video_ids.len() == before {
            return Ok(MembershipChange::Unchanged);
        }
        playlist.updated_at = Utc::now();
        Ok(MembershipChange::Applied)
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn create(
        &self,
        subscriber_id: Uuid,
        subscribed_to_id: Uuid,
    ) -> Result<Option<Subscription>> {
        let mut tables = self.tables.lock().await;
        let exists = tables
            .subscriptions
            .iter()
            .any(|s| s.subscriber_id == subscriber_id && s.subscribed_to_id == subscribed_to_id);
        if exists {
            return Ok(None);
        }

        let subscription = Subscription {
            id: Uuid::new_v4(),
            subscriber_id,
            subscribed_to_id,
            created_at: Utc::now(),
        };
        tables.subscriptions.push(subscription.clone());
        Ok(Some(subscription))
    }

    async fn list_for_subscriber(&self, subscriber_id: Uuid) -> Result<Vec<Subscription>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .subscriptions
            .iter()
            .rev()
            .filter(|s| s.subscriber_id == subscriber_id)
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        subscriber_id: Uuid,
        subscribed_to_id: Uuid,
    ) -> Result<Option<Subscription>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .subscriptions
            .iter()
            .find(|s| s.subscriber_id == subscriber_id && s.subscribed_to_id == subscribed_to_id)
            .cloned())
    }

    async fn delete(&self, subscriber_id: Uuid, subscribed_to_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.subscriptions.len();
        tables
            .subscriptions
            .retain(|s| !(s.subscriber_id == subscriber_id && s.subscribed_to_id == subscribed_to_id));
        Ok(tables.subscriptions.len() < before)
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn like(&self, user_id: Uuid, video_id: Uuid) -> Result<Option<Like>> {
        let mut tables = self.tables.lock().await;
        if tables
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.video_id == video_id)
        {
            return Ok(None);
        }

        let like = Like {
            id: Uuid::new_v4(),
            user_id,
            video_id,
            created_at: Utc::now(),
        };
        tables.likes.push(like.clone());
        Ok(Some(like))
    }

    async fn unlike(&self, user_id: Uuid, video_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.likes.len();
        tables
            .likes
            .retain(|l| !(l.user_id == user_id && l.video_id == video_id));
        Ok(tables.likes.len() < before)
    }

    async fn count_for_video(&self, video_id: Uuid) -> Result<i64> {
        let tables = self.tables.lock().await;
        Ok(tables.likes.iter().filter(|l| l.video_id == video_id).count() as i64)
    }

    async fn has_liked(&self, user_id: Uuid, video_id: Uuid) -> Result<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.video_id == video_id))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Like>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .likes
            .iter()
            .rev()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn new_video(user_id: Uuid, title: &str) -> NewVideo {
        NewVideo {
            title: title.to_string(),
            description: None,
            video_url: format!("https://cdn.example.com/{title}.mp4"),
            back_img_video_url: None,
            user_id,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn concurrent_view_increments_are_not_lost() {
        let store = MemoryStore::new();
        let owner = store.add_user("alice", "alice@example.com").await;
        let video = VideoStore::create(&store, &new_video(owner, "intro"))
            .await
            .unwrap();
        let video_id = video.id;

        let handles: Vec<_> = (0..25)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.increment_views(video_id).await.unwrap() })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = VideoStore::get(&store, video_id).await.unwrap().unwrap();
        assert_eq!(stored.video.views, 25);
    }

    #[tokio::test]
    async fn video_details_carry_owner_profile() {
        let store = MemoryStore::new();
        let owner = store.add_user("alice", "alice@example.com").await;
        let video = VideoStore::create(&store, &new_video(owner, "intro"))
            .await
            .unwrap();

        let details = VideoStore::get(&store, video.id).await.unwrap().unwrap();
        let user = details.user.unwrap();
        assert_eq!(user.user_name, "alice");
        assert_eq!(user.id, owner);
    }

    #[tokio::test]
    async fn playlist_membership_is_idempotent() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let playlist = PlaylistStore::create(
            &store,
            &NewPlaylist {
                name: "favourites".to_string(),
                description: None,
                user_id: owner,
            },
        )
        .await
        .unwrap();
        let video_id = Uuid::new_v4();

        assert_eq!(
            store.add_video(playlist.id, video_id).await.unwrap(),
            MembershipChange::Applied
        );
        assert_eq!(
            store.add_video(playlist.id, video_id).await.unwrap(),
            MembershipChange::Unchanged
        );

        let stored = PlaylistStore::get(&store, playlist.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.video_ids, vec![video_id]);

        assert_eq!(
            store.add_video(Uuid::new_v4(), video_id).await.unwrap(),
            MembershipChange::PlaylistNotFound
        );
    }

    #[tokio::test]
    async fn deleting_a_video_prunes_playlists() {
        let store = MemoryStore::new();
        let owner = store.add_user("alice", "alice@example.com").await;
        let kept = assert_ok!(VideoStore::create(&store, &new_video(owner, "kept")).await);
        let gone = assert_ok!(VideoStore::create(&store, &new_video(owner, "gone")).await);
        let playlist = assert_ok!(
            PlaylistStore::create(
                &store,
                &NewPlaylist {
                    name: "mix".to_string(),
                    description: None,
                    user_id: owner,
                },
            )
            .await
        );
        assert_ok!(store.add_video(playlist.id, kept.id).await);
        assert_ok!(store.add_video(playlist.id, gone.id).await);

        assert!(assert_ok!(VideoStore::delete(&store, gone.id).await));

        let stored = assert_ok!(PlaylistStore::get(&store, playlist.id).await).unwrap();
        assert_eq!(stored.video_ids, vec![kept.id]);
    }

    #[tokio::test]
    async fn deleting_a_video_drops_its_likes() {
        let store = MemoryStore::new();
        let owner = store.add_user("alice", "alice@example.com").await;
        let video = assert_ok!(VideoStore::create(&store, &new_video(owner, "intro")).await);

        assert!(assert_ok!(store.like(owner, video.id).await).is_some());
        assert!(assert_ok!(store.like(owner, video.id).await).is_none());
        assert!(assert_ok!(VideoStore::delete(&store, video.id).await));
        assert_eq!(assert_ok!(store.count_for_video(video.id).await), 0);
    }
}
