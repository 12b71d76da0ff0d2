//! Media asset lifecycle manager.
//!
//! The asset store and the database share no transaction, so every operation
//! that touches both runs as a saga: steps in a fixed order, each later
//! failure compensated by deleting the objects already uploaded. Partial
//! states are surfaced in the error, never swallowed.

use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};

use super::{asset_call, repo_call};
use crate::domain::catalog::{AssetRef, OwnerId, Video, VideoId};
use crate::domain::error::DomainError;
use crate::ports::assets::{AssetKind, AssetStore};
use crate::ports::repository::{VideoPatch, VideoRepository};

/// Caller-supplied metadata for a new video.
#[derive(Debug, Clone)]
pub struct VideoDraft {
    pub title: String,
    pub description: String,
}

pub struct MediaService<A, R> {
    assets: A,
    videos: R,
    call_timeout: Duration,
}

impl<A, R> MediaService<A, R>
where
    A: AssetStore,
    R: VideoRepository,
{
    pub fn new(assets: A, videos: R, call_timeout: Duration) -> Self {
        Self {
            assets,
            videos,
            call_timeout,
        }
    }

    /// Publish a new video: upload both assets, then create the record.
    ///
    /// The record is created last, so no persisted video ever lacks an
    /// asset. Conversely, any upload that ends up unreferenced because a
    /// later step failed is deleted before the error returns.
    pub async fn publish(
        &self,
        video_bytes: Bytes,
        thumbnail_bytes: Bytes,
        draft: &VideoDraft,
        owner: &OwnerId,
    ) -> Result<Video, DomainError> {
        const OP: &str = "publish_video";

        // 1. Validate metadata before touching either store.
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title", "must not be empty"));
        }
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(DomainError::validation("description", "must not be empty"));
        }

        // 2. Upload the video asset. Nothing is persisted yet, so a failure
        //    here aborts with nothing to clean up.
        let video_asset = asset_call(
            self.call_timeout,
            OP,
            "upload_video",
            Vec::new(),
            self.assets.put(video_bytes, AssetKind::Video),
        )
        .await?;

        // 3. Upload the thumbnail. The already-uploaded video asset must not
        //    leak if this fails.
        let thumbnail = match asset_call(
            self.call_timeout,
            OP,
            "upload_thumbnail",
            Vec::new(),
            self.assets.put(thumbnail_bytes, AssetKind::Thumbnail),
        )
        .await
        {
            Ok(stored) => stored,
            Err(failure) => {
                warn!(error = %failure, "thumbnail upload failed, compensating video asset");
                self.delete_asset(OP, "compensate_video_asset", &video_asset.asset_ref)
                    .await?;
                return Err(failure);
            }
        };

        // 4. Create the record binding both refs and the store-reported
        //    duration.
        let video = Video::new(
            owner.clone(),
            title,
            description,
            video_asset.asset_ref.clone(),
            thumbnail.asset_ref.clone(),
            video_asset.duration_seconds.unwrap_or(0.0),
        );
        match repo_call(
            self.call_timeout,
            OP,
            "create_record",
            self.videos.create_video(video),
        )
        .await
        {
            Ok(created) => {
                info!(video = %created.id, owner = %created.owner, "video published");
                Ok(created)
            }
            Err(failure) => {
                warn!(error = %failure, "record create failed, compensating both assets");
                // Both uploads are unreferenced now, so both deletes must be
                // attempted even if the first one keeps failing. Whatever is
                // still orphaned afterwards goes into the surfaced error.
                let mut orphaned = Vec::new();
                for (step, asset_ref) in [
                    ("compensate_video_asset", &video_asset.asset_ref),
                    ("compensate_thumbnail_asset", &thumbnail.asset_ref),
                ] {
                    if let Err(err) = self.delete_asset(OP, step, asset_ref).await {
                        warn!(asset = %asset_ref, error = %err, "compensation exhausted");
                        orphaned.push(asset_ref.clone());
                    }
                }
                if orphaned.is_empty() {
                    Err(failure)
                } else {
                    Err(DomainError::dependency(
                        OP,
                        "compensate_assets",
                        orphaned,
                        format!("cleanup incomplete after create failure: {}", failure),
                    ))
                }
            }
        }
    }

    /// Swap the thumbnail. The old asset is deleted only after the record
    /// update commits; a failed update must never leave the record pointing
    /// at a missing asset.
    pub async fn replace_thumbnail(
        &self,
        video_id: &VideoId,
        thumbnail_bytes: Bytes,
        owner: &OwnerId,
    ) -> Result<Video, DomainError> {
        const OP: &str = "replace_thumbnail";

        let current = self.owned_video(OP, video_id, owner).await?;

        let new_thumbnail = asset_call(
            self.call_timeout,
            OP,
            "upload_thumbnail",
            Vec::new(),
            self.assets.put(thumbnail_bytes, AssetKind::Thumbnail),
        )
        .await?;

        let patch = VideoPatch {
            thumbnail_asset: Some(new_thumbnail.asset_ref.clone()),
            ..VideoPatch::default()
        };
        self.commit_update(
            OP,
            video_id,
            owner,
            patch,
            Some((&new_thumbnail.asset_ref, &current.thumbnail_asset)),
        )
        .await
    }

    /// Update title/description, optionally replacing the thumbnail.
    ///
    /// A no-op update (nothing provided, or values equal to the current
    /// record) is a successful no-op, not an error.
    pub async fn update_metadata(
        &self,
        video_id: &VideoId,
        owner: &OwnerId,
        title: Option<&str>,
        description: Option<&str>,
        thumbnail_bytes: Option<Bytes>,
    ) -> Result<Video, DomainError> {
        const OP: &str = "update_video";

        let current = self.owned_video(OP, video_id, owner).await?;

        let mut patch = VideoPatch::default();
        if let Some(title) = title.map(str::trim) {
            if title.is_empty() {
                return Err(DomainError::validation("title", "must not be empty"));
            }
            if title != current.title {
                patch.title = Some(title.to_owned());
            }
        }
        if let Some(description) = description.map(str::trim) {
            if description.is_empty() {
                return Err(DomainError::validation("description", "must not be empty"));
            }
            if description != current.description {
                patch.description = Some(description.to_owned());
            }
        }

        let thumbnail = match thumbnail_bytes {
            Some(bytes) => Some(
                asset_call(
                    self.call_timeout,
                    OP,
                    "upload_thumbnail",
                    Vec::new(),
                    self.assets.put(bytes, AssetKind::Thumbnail),
                )
                .await?,
            ),
            None => None,
        };

        match thumbnail {
            Some(stored) => {
                patch.thumbnail_asset = Some(stored.asset_ref.clone());
                self.commit_update(
                    OP,
                    video_id,
                    owner,
                    patch,
                    Some((&stored.asset_ref, &current.thumbnail_asset)),
                )
                .await
            }
            None if patch.is_empty() => Ok(current),
            None => self.commit_update(OP, video_id, owner, patch, None).await,
        }
    }

    /// Delete a video and its assets. Assets go first: a mid-failure leaves
    /// a record whose refs still resolve, so the operation is safe to retry.
    /// The record remains for retry if any step fails.
    pub async fn delete(&self, video_id: &VideoId, owner: &OwnerId) -> Result<Video, DomainError> {
        const OP: &str = "delete_video";

        let video = self.owned_video(OP, video_id, owner).await?;

        self.delete_asset(OP, "delete_video_asset", &video.video_asset)
            .await?;
        self.delete_asset(OP, "delete_thumbnail_asset", &video.thumbnail_asset)
            .await?;

        let deleted = repo_call(
            self.call_timeout,
            OP,
            "delete_record",
            self.videos.conditional_delete_video(video_id, owner),
        )
        .await?
        .ok_or_else(|| DomainError::not_found("video", video_id.as_str()))?;

        info!(video = %deleted.id, "video deleted");
        Ok(deleted)
    }

    /// Flip the publish state. No asset interaction.
    pub async fn toggle_publish(
        &self,
        video_id: &VideoId,
        owner: &OwnerId,
    ) -> Result<Video, DomainError> {
        const OP: &str = "toggle_publish";

        let current = self.owned_video(OP, video_id, owner).await?;
        let patch = VideoPatch {
            is_published: Some(!current.is_published),
            ..VideoPatch::default()
        };

        repo_call(
            self.call_timeout,
            OP,
            "update_record",
            self.videos.conditional_update_video(video_id, owner, patch),
        )
        .await?
        .ok_or_else(|| DomainError::not_found("video", video_id.as_str()))
    }

    /// Fetch the video and check ownership: absent is not-found, present
    /// under another owner is an authorization failure.
    async fn owned_video(
        &self,
        operation: &'static str,
        video_id: &VideoId,
        owner: &OwnerId,
    ) -> Result<Video, DomainError> {
        let video = repo_call(
            self.call_timeout,
            operation,
            "find_video",
            self.videos.find_video(video_id),
        )
        .await?
        .ok_or_else(|| DomainError::not_found("video", video_id.as_str()))?;

        if video.owner != *owner {
            return Err(DomainError::authorization("video", video_id.as_str()));
        }
        Ok(video)
    }

    /// Commit a conditional record update, then delete the superseded
    /// thumbnail. `swap` is (freshly uploaded, old) refs when a thumbnail is
    /// being replaced; the fresh asset is compensated if the update does not
    /// commit, and the old one is removed only after it does.
    async fn commit_update(
        &self,
        operation: &'static str,
        video_id: &VideoId,
        owner: &OwnerId,
        patch: VideoPatch,
        swap: Option<(&AssetRef, &AssetRef)>,
    ) -> Result<Video, DomainError> {
        let updated = match repo_call(
            self.call_timeout,
            operation,
            "update_record",
            self.videos.conditional_update_video(video_id, owner, patch),
        )
        .await
        {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                if let Some((fresh, _)) = swap {
                    self.delete_asset(operation, "compensate_thumbnail_asset", fresh)
                        .await?;
                }
                // Lost a race with a concurrent delete.
                return Err(DomainError::not_found("video", video_id.as_str()));
            }
            Err(failure) => {
                if let Some((fresh, _)) = swap {
                    self.delete_asset(operation, "compensate_thumbnail_asset", fresh)
                        .await?;
                }
                return Err(failure);
            }
        };

        if let Some((_, old)) = swap {
            // The record already points at the new asset. If this cleanup
            // fails even after the retry, the error names the stale ref; the
            // commit itself stands.
            self.delete_asset(operation, "delete_old_thumbnail", old)
                .await?;
        }
        Ok(updated)
    }

    /// Delete one stored object, retrying once before surfacing the failure.
    /// The store treats deleting a missing ref as success, so retries
    /// converge.
    async fn delete_asset(
        &self,
        operation: &'static str,
        step: &'static str,
        asset_ref: &AssetRef,
    ) -> Result<(), DomainError> {
        let first = asset_call(
            self.call_timeout,
            operation,
            step,
            vec![asset_ref.clone()],
            self.assets.delete(asset_ref),
        )
        .await;
        match first {
            Ok(()) => Ok(()),
            Err(failure) => {
                warn!(asset = %asset_ref, error = %failure, "asset delete failed, retrying once");
                asset_call(
                    self.call_timeout,
                    operation,
                    step,
                    vec![asset_ref.clone()],
                    self.assets.delete(asset_ref),
                )
                .await
            }
        }
    }
}
