//! Engagement context entities: comments, likes, subscriptions.
//!
//! Their CRUD lives outside the core; the types are here because the catalog
//! references them (a like targets either a video or a comment).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{OwnerId, VideoId};
use super::macros::id_string;

id_string!(CommentId);
id_string!(LikeId);
id_string!(SubscriptionId);

/// The kind of entity a like can target. Dispatch is a static match table;
/// there is no runtime type resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Video,
    Comment,
}

impl EntityKind {
    /// Collection the target id resolves against.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Video => "videos",
            EntityKind::Comment => "comments",
        }
    }
}

/// Tagged reference to the liked entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedEntity {
    pub kind: EntityKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: LikeId,
    pub target: LikedEntity,
    pub liked_by: OwnerId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub video: VideoId,
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: SubscriptionId,
    pub subscriber: OwnerId,
    pub channel: OwnerId,
    pub created_at: DateTime<Utc>,
}
