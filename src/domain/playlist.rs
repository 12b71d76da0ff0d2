//! Playlist entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{OwnerId, VideoId};
use super::macros::id_string;

id_string!(
    /// Identifier of a playlist.
    PlaylistId
);

/// An owner-curated, ordered collection of video references.
///
/// (owner, name) is unique across all playlists; the persistence layer
/// enforces the constraint and the membership engine maps violations to a
/// conflict error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub description: String,
    pub owner: OwnerId,
    /// Semantically a set with insertion order preserved for display.
    /// Entries are not cleaned up when the referenced video is deleted;
    /// consumers must tolerate dangling references.
    pub video_refs: Vec<VideoId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    pub fn new(owner: OwnerId, name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PlaylistId::new(),
            name: name.into(),
            description: description.into(),
            owner,
            video_refs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn contains(&self, video: &VideoId) -> bool {
        self.video_refs.contains(video)
    }
}
