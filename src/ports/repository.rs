//! Persistence collaborator port.
//!
//! The document store is the only place cross-instance correctness lives:
//! every mutation scoped by (id, owner) must be an atomic
//! match-filter-then-mutate, returning the updated document or nothing.
//! No in-process lock substitutes for that primitive.

use async_trait::async_trait;
use std::fmt;

use crate::domain::catalog::{AssetRef, OwnerId, Video, VideoId};
use crate::domain::playlist::{Playlist, PlaylistId};
use crate::domain::query::{SortDirection, SortField};

#[derive(Debug)]
pub enum RepositoryError {
    /// A uniqueness constraint was violated, possibly only at commit time
    /// under a concurrent create race.
    UniqueViolation {
        collection: &'static str,
        detail: String,
    },
    Unavailable(String),
    Serialization(serde_json::Error),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::UniqueViolation { collection, detail } => {
                write!(f, "unique violation in {}: {}", collection, detail)
            }
            RepositoryError::Unavailable(detail) => write!(f, "store unavailable: {}", detail),
            RepositoryError::Serialization(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepositoryError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err)
    }
}

/// Equality filter over the video collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFilter {
    pub owner: OwnerId,
    /// `None` matches both published and unpublished videos.
    pub is_published: Option<bool>,
}

/// Partial update of a video record. Unset fields are left untouched;
/// the store bumps `updated_at` on any applied patch.
#[derive(Debug, Clone, Default)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_asset: Option<AssetRef>,
    pub is_published: Option<bool>,
}

impl VideoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.thumbnail_asset.is_none()
            && self.is_published.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlaylistPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create_video(&self, video: Video) -> Result<Video, RepositoryError>;

    async fn find_video(&self, id: &VideoId) -> Result<Option<Video>, RepositoryError>;

    /// Atomically patch the video matching (id, owner). `None` when the
    /// filter matched nothing.
    async fn conditional_update_video(
        &self,
        id: &VideoId,
        owner: &OwnerId,
        patch: VideoPatch,
    ) -> Result<Option<Video>, RepositoryError>;

    /// Atomically delete the video matching (id, owner), returning it.
    async fn conditional_delete_video(
        &self,
        id: &VideoId,
        owner: &OwnerId,
    ) -> Result<Option<Video>, RepositoryError>;

    async fn count_videos(&self, filter: &VideoFilter) -> Result<u64, RepositoryError>;

    /// Fetch one sorted slice of the matching videos. Ties on the primary
    /// sort value are broken by id ascending, regardless of direction;
    /// paging is not deterministic without that secondary key.
    async fn page_videos(
        &self,
        filter: &VideoFilter,
        sort: SortField,
        direction: SortDirection,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Video>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Insert a new playlist. The store enforces (owner, name) uniqueness
    /// and reports violations as `RepositoryError::UniqueViolation`.
    async fn create_playlist(&self, playlist: Playlist) -> Result<Playlist, RepositoryError>;

    async fn find_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>, RepositoryError>;

    async fn playlists_for_owner(&self, owner: &OwnerId) -> Result<Vec<Playlist>, RepositoryError>;

    /// Add-if-absent on the membership set, scoped by (id, owner).
    /// Returns the updated playlist, or `None` when the filter matched
    /// nothing. Adding an already-present ref is a successful no-op.
    async fn add_video_ref(
        &self,
        id: &PlaylistId,
        owner: &OwnerId,
        video: &VideoId,
    ) -> Result<Option<Playlist>, RepositoryError>;

    /// Remove-if-present on the membership set, scoped by (id, owner).
    /// Removing an absent ref is a successful no-op.
    async fn remove_video_ref(
        &self,
        id: &PlaylistId,
        owner: &OwnerId,
        video: &VideoId,
    ) -> Result<Option<Playlist>, RepositoryError>;

    async fn conditional_update_playlist(
        &self,
        id: &PlaylistId,
        owner: &OwnerId,
        patch: PlaylistPatch,
    ) -> Result<Option<Playlist>, RepositoryError>;

    async fn conditional_delete_playlist(
        &self,
        id: &PlaylistId,
        owner: &OwnerId,
    ) -> Result<Option<Playlist>, RepositoryError>;
}
