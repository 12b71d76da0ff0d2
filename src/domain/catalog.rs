//! Video catalog entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::macros::id_string;

id_string!(
    /// Identifier of a catalog video.
    VideoId
);

id_string!(
    /// Identifier of the user that owns a resource. Supplied by the identity
    /// collaborator; the core never authenticates, only compares.
    OwnerId
);

id_string!(
    /// Opaque reference to an object held by the external asset store.
    AssetRef
);

/// A catalog video. A persisted `Video` always carries both asset refs:
/// the record is only created after both uploads succeed, and deleted
/// record-last, so no record ever points at nothing it could resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub video_asset: AssetRef,
    pub thumbnail_asset: AssetRef,
    pub duration_seconds: f64,
    pub view_count: u64,
    pub is_published: bool,
    /// Immutable after creation.
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(
        owner: OwnerId,
        title: impl Into<String>,
        description: impl Into<String>,
        video_asset: AssetRef,
        thumbnail_asset: AssetRef,
        duration_seconds: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: VideoId::new(),
            title: title.into(),
            description: description.into(),
            video_asset,
            thumbnail_asset,
            duration_seconds,
            view_count: 0,
            is_published: true,
            owner,
            created_at: now,
            updated_at: now,
        }
    }
}
