//! In-memory document store implementing both repository ports.
//!
//! All collections live behind one write lock, so every conditional
//! mutation is atomic: the filter match and the mutation happen under the
//! same guard, which is the same contract a real document store gives via
//! find-and-modify.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::catalog::{OwnerId, Video, VideoId};
use crate::domain::playlist::{Playlist, PlaylistId};
use crate::domain::query::{SortDirection, SortField};
use crate::ports::repository::{
    PlaylistPatch, PlaylistRepository, RepositoryError, VideoFilter, VideoPatch, VideoRepository,
};

#[derive(Default)]
struct State {
    videos: HashMap<VideoId, Video>,
    playlists: HashMap<PlaylistId, Playlist>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filter(video: &Video, filter: &VideoFilter) -> bool {
    video.owner == filter.owner
        && filter
            .is_published
            .map(|wanted| video.is_published == wanted)
            .unwrap_or(true)
}

fn compare(a: &Video, b: &Video, sort: SortField, direction: SortDirection) -> Ordering {
    let primary = match sort {
        SortField::Date => a.created_at.cmp(&b.created_at),
        SortField::Views => a.view_count.cmp(&b.view_count),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Duration => a.duration_seconds.total_cmp(&b.duration_seconds),
    };
    let primary = match direction {
        SortDirection::Ascending => primary,
        SortDirection::Descending => primary.reverse(),
    };
    // Secondary key is id ascending regardless of direction; paging over
    // equal primary values is not stable without it.
    primary.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl VideoRepository for MemoryStore {
    async fn create_video(&self, video: Video) -> Result<Video, RepositoryError> {
        let mut state = self.inner.write().await;
        state.videos.insert(video.id.clone(), video.clone());
        Ok(video)
    }

    async fn find_video(&self, id: &VideoId) -> Result<Option<Video>, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state.videos.get(id).cloned())
    }

    async fn conditional_update_video(
        &self,
        id: &VideoId,
        owner: &OwnerId,
        patch: VideoPatch,
    ) -> Result<Option<Video>, RepositoryError> {
        let mut state = self.inner.write().await;
        let video = match state.videos.get_mut(id) {
            Some(video) if video.owner == *owner => video,
            _ => return Ok(None),
        };

        if let Some(title) = patch.title {
            video.title = title;
        }
        if let Some(description) = patch.description {
            video.description = description;
        }
        if let Some(thumbnail_asset) = patch.thumbnail_asset {
            video.thumbnail_asset = thumbnail_asset;
        }
        if let Some(is_published) = patch.is_published {
            video.is_published = is_published;
        }
        video.updated_at = Utc::now();
        Ok(Some(video.clone()))
    }

    async fn conditional_delete_video(
        &self,
        id: &VideoId,
        owner: &OwnerId,
    ) -> Result<Option<Video>, RepositoryError> {
        let mut state = self.inner.write().await;
        match state.videos.get(id) {
            Some(video) if video.owner == *owner => Ok(state.videos.remove(id)),
            _ => Ok(None),
        }
    }

    async fn count_videos(&self, filter: &VideoFilter) -> Result<u64, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state
            .videos
            .values()
            .filter(|v| matches_filter(v, filter))
            .count() as u64)
    }

    async fn page_videos(
        &self,
        filter: &VideoFilter,
        sort: SortField,
        direction: SortDirection,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Video>, RepositoryError> {
        let state = self.inner.read().await;
        let mut matching: Vec<Video> = state
            .videos
            .values()
            .filter(|v| matches_filter(v, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare(a, b, sort, direction));
        Ok(matching
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }
}

#[async_trait]
impl PlaylistRepository for MemoryStore {
    async fn create_playlist(&self, playlist: Playlist) -> Result<Playlist, RepositoryError> {
        let mut state = self.inner.write().await;
        // The uniqueness check and the insert share the write guard, so a
        // concurrent create race cannot slip two copies in.
        let taken = state
            .playlists
            .values()
            .any(|p| p.owner == playlist.owner && p.name == playlist.name);
        if taken {
            return Err(RepositoryError::UniqueViolation {
                collection: "playlists",
                detail: format!("name '{}' already exists for this owner", playlist.name),
            });
        }
        state.playlists.insert(playlist.id.clone(), playlist.clone());
        Ok(playlist)
    }

    async fn find_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state.playlists.get(id).cloned())
    }

    async fn playlists_for_owner(
        &self,
        owner: &OwnerId,
    ) -> Result<Vec<Playlist>, RepositoryError> {
        let state = self.inner.read().await;
        let mut mine: Vec<Playlist> = state
            .playlists
            .values()
            .filter(|p| p.owner == *owner)
            .cloned()
            .collect();
        mine.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(mine)
    }

    async fn add_video_ref(
        &self,
        id: &PlaylistId,
        owner: &OwnerId,
        video: &VideoId,
    ) -> Result<Option<Playlist>, RepositoryError> {
        let mut state = self.inner.write().await;
        let playlist = match state.playlists.get_mut(id) {
            Some(playlist) if playlist.owner == *owner => playlist,
            _ => return Ok(None),
        };
        if !playlist.video_refs.contains(video) {
            playlist.video_refs.push(video.clone());
            playlist.updated_at = Utc::now();
        }
        Ok(Some(playlist.clone()))
    }

    async fn remove_video_ref(
        &self,
        id: &PlaylistId,
        owner: &OwnerId,
        video: &VideoId,
    ) -> Result<Option<Playlist>, RepositoryError> {
        let mut state = self.inner.write().await;
        let playlist = match state.playlists.get_mut(id) {
            Some(playlist) if playlist.owner == *owner => playlist,
            _ => return Ok(None),
        };
        if let Some(position) = playlist.video_refs.iter().position(|v| v == video) {
            playlist.video_refs.remove(position);
            playlist.updated_at = Utc::now();
        }
        Ok(Some(playlist.clone()))
    }

    async fn conditional_update_playlist(
        &self,
        id: &PlaylistId,
        owner: &OwnerId,
        patch: PlaylistPatch,
    ) -> Result<Option<Playlist>, RepositoryError> {
        let mut state = self.inner.write().await;

        if let Some(name) = &patch.name {
            // Renaming must honour the same (owner, name) constraint.
            let taken = state
                .playlists
                .values()
                .any(|p| p.owner == *owner && p.name == *name && p.id != *id);
            if taken {
                return Err(RepositoryError::UniqueViolation {
                    collection: "playlists",
                    detail: format!("name '{}' already exists for this owner", name),
                });
            }
        }

        let playlist = match state.playlists.get_mut(id) {
            Some(playlist) if playlist.owner == *owner => playlist,
            _ => return Ok(None),
        };
        if let Some(name) = patch.name {
            playlist.name = name;
        }
        if let Some(description) = patch.description {
            playlist.description = description;
        }
        playlist.updated_at = Utc::now();
        Ok(Some(playlist.clone()))
    }

    async fn conditional_delete_playlist(
        &self,
        id: &PlaylistId,
        owner: &OwnerId,
    ) -> Result<Option<Playlist>, RepositoryError> {
        let mut state = self.inner.write().await;
        match state.playlists.get(id) {
            Some(playlist) if playlist.owner == *owner => Ok(state.playlists.remove(id)),
            _ => Ok(None),
        }
    }
}
