//! Playlist membership engine.
//!
//! All membership mutations are idempotent and commute: any interleaving of
//! add/remove calls converges to the same membership set, because the only
//! synchronization point is the repository's atomic conditional update.

use std::time::Duration;

use super::repo_call;
use crate::domain::catalog::{OwnerId, VideoId};
use crate::domain::error::DomainError;
use crate::domain::playlist::{Playlist, PlaylistId};
use crate::ports::repository::{PlaylistPatch, PlaylistRepository, VideoRepository};

pub struct PlaylistService<P, V> {
    playlists: P,
    videos: V,
    call_timeout: Duration,
}

impl<P, V> PlaylistService<P, V>
where
    P: PlaylistRepository,
    V: VideoRepository,
{
    pub fn new(playlists: P, videos: V, call_timeout: Duration) -> Self {
        Self {
            playlists,
            videos,
            call_timeout,
        }
    }

    /// Create a playlist. (owner, name) uniqueness is enforced by the store;
    /// a violation, including one detected only at commit time under a
    /// concurrent create race, surfaces as a conflict.
    pub async fn create(
        &self,
        owner: &OwnerId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Playlist, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name", "must not be empty"));
        }
        let description = description.map(str::trim).unwrap_or("");

        repo_call(
            self.call_timeout,
            "create_playlist",
            "insert",
            self.playlists
                .create_playlist(Playlist::new(owner.clone(), name, description)),
        )
        .await
    }

    pub async fn find(&self, id: &PlaylistId) -> Result<Playlist, DomainError> {
        repo_call(
            self.call_timeout,
            "get_playlist",
            "find",
            self.playlists.find_playlist(id),
        )
        .await?
        .ok_or_else(|| DomainError::not_found("playlist", id.as_str()))
    }

    pub async fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Playlist>, DomainError> {
        repo_call(
            self.call_timeout,
            "list_playlists",
            "find",
            self.playlists.playlists_for_owner(owner),
        )
        .await
    }

    /// Add a video reference. Idempotent: repeated calls converge to one
    /// occurrence in the membership set.
    pub async fn add_video(
        &self,
        playlist_id: &PlaylistId,
        video_id: &VideoId,
        requester: &OwnerId,
    ) -> Result<Playlist, DomainError> {
        const OP: &str = "add_video_to_playlist";

        let video = repo_call(
            self.call_timeout,
            OP,
            "find_video",
            self.videos.find_video(video_id),
        )
        .await?;
        if video.is_none() {
            return Err(DomainError::not_found("video", video_id.as_str()));
        }

        self.authorize(OP, playlist_id, requester).await?;

        repo_call(
            self.call_timeout,
            OP,
            "add_ref",
            self.playlists.add_video_ref(playlist_id, requester, video_id),
        )
        .await?
        // Authorized a moment ago, so a miss means the playlist went away.
        .ok_or_else(|| DomainError::not_found("playlist", playlist_id.as_str()))
    }

    /// Remove a video reference. Removing an absent membership is a
    /// successful no-op, which also lets owners drop dangling references to
    /// videos deleted after they were added.
    pub async fn remove_video(
        &self,
        playlist_id: &PlaylistId,
        video_id: &VideoId,
        requester: &OwnerId,
    ) -> Result<Playlist, DomainError> {
        const OP: &str = "remove_video_from_playlist";

        self.authorize(OP, playlist_id, requester).await?;

        repo_call(
            self.call_timeout,
            OP,
            "remove_ref",
            self.playlists
                .remove_video_ref(playlist_id, requester, video_id),
        )
        .await?
        .ok_or_else(|| DomainError::not_found("playlist", playlist_id.as_str()))
    }

    /// Rename or re-describe a playlist. At least one field must be given.
    pub async fn update(
        &self,
        playlist_id: &PlaylistId,
        requester: &OwnerId,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Playlist, DomainError> {
        const OP: &str = "update_playlist";

        if name.is_none() && description.is_none() {
            return Err(DomainError::validation(
                "name",
                "changes to name or description are required",
            ));
        }

        let mut patch = PlaylistPatch::default();
        if let Some(name) = name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::validation("name", "must not be empty"));
            }
            patch.name = Some(name.to_owned());
        }
        if let Some(description) = description {
            patch.description = Some(description.trim().to_owned());
        }

        self.authorize(OP, playlist_id, requester).await?;

        repo_call(
            self.call_timeout,
            OP,
            "update",
            self.playlists
                .conditional_update_playlist(playlist_id, requester, patch),
        )
        .await?
        .ok_or_else(|| DomainError::not_found("playlist", playlist_id.as_str()))
    }

    pub async fn delete(
        &self,
        playlist_id: &PlaylistId,
        requester: &OwnerId,
    ) -> Result<Playlist, DomainError> {
        const OP: &str = "delete_playlist";

        self.authorize(OP, playlist_id, requester).await?;

        repo_call(
            self.call_timeout,
            OP,
            "delete",
            self.playlists
                .conditional_delete_playlist(playlist_id, requester),
        )
        .await?
        .ok_or_else(|| DomainError::not_found("playlist", playlist_id.as_str()))
    }

    /// Single lookup feeding both halves of the miss policy: an absent
    /// playlist is not-found, a playlist held by someone else is an
    /// authorization failure. The conditional mutation that follows still
    /// re-checks (id, owner) atomically.
    async fn authorize(
        &self,
        operation: &'static str,
        playlist_id: &PlaylistId,
        requester: &OwnerId,
    ) -> Result<(), DomainError> {
        let playlist = repo_call(
            self.call_timeout,
            operation,
            "find_playlist",
            self.playlists.find_playlist(playlist_id),
        )
        .await?
        .ok_or_else(|| DomainError::not_found("playlist", playlist_id.as_str()))?;

        if playlist.owner != *requester {
            return Err(DomainError::authorization("playlist", playlist_id.as_str()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::catalog::{AssetRef, Video};

    fn service(store: &MemoryStore) -> PlaylistService<MemoryStore, MemoryStore> {
        PlaylistService::new(store.clone(), store.clone(), Duration::from_secs(1))
    }

    async fn seed_video(store: &MemoryStore, id: &str, owner: &str) -> VideoId {
        let mut v = Video::new(
            OwnerId::from(owner),
            "a title",
            "a description",
            AssetRef::from(format!("asset-{id}").as_str()),
            AssetRef::from(format!("thumb-{id}").as_str()),
            12.0,
        );
        v.id = VideoId::from(id);
        store.create_video(v).await.unwrap().id
    }

    #[tokio::test]
    async fn create_trims_and_validates_the_name() {
        let store = MemoryStore::default();
        let svc = service(&store);
        let owner = OwnerId::from("u1");

        let created = svc
            .create(&owner, "  Favorites  ", Some("  best ones "))
            .await
            .unwrap();
        assert_eq!(created.name, "Favorites");
        assert_eq!(created.description, "best ones");

        let err = svc.create(&owner, "   ", None).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "name", .. }));
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_only_within_one_owner() {
        let store = MemoryStore::default();
        let svc = service(&store);

        svc.create(&OwnerId::from("u1"), "Favorites", None)
            .await
            .unwrap();

        let err = svc
            .create(&OwnerId::from("u1"), "Favorites", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        // A different owner may reuse the name.
        svc.create(&OwnerId::from("u2"), "Favorites", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn add_video_is_idempotent() {
        let store = MemoryStore::default();
        let svc = service(&store);
        let owner = OwnerId::from("u1");

        let video = seed_video(&store, "v1", "u1").await;
        let playlist = svc.create(&owner, "Watch later", None).await.unwrap();

        let once = svc.add_video(&playlist.id, &video, &owner).await.unwrap();
        let twice = svc.add_video(&playlist.id, &video, &owner).await.unwrap();

        assert_eq!(once.video_refs, vec![video.clone()]);
        assert_eq!(twice.video_refs, once.video_refs);
    }

    #[tokio::test]
    async fn add_video_requires_the_video_to_exist() {
        let store = MemoryStore::default();
        let svc = service(&store);
        let owner = OwnerId::from("u1");
        let playlist = svc.create(&owner, "Watch later", None).await.unwrap();

        let err = svc
            .add_video(&playlist.id, &VideoId::from("nope"), &owner)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { resource: "video", .. }));
    }

    #[tokio::test]
    async fn foreign_requester_is_rejected_and_membership_is_untouched() {
        let store = MemoryStore::default();
        let svc = service(&store);
        let owner = OwnerId::from("u1");
        let stranger = OwnerId::from("u2");

        let video = seed_video(&store, "v1", "u1").await;
        let playlist = svc.create(&owner, "Watch later", None).await.unwrap();

        let err = svc
            .add_video(&playlist.id, &video, &stranger)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Authorization { resource: "playlist", .. }
        ));

        let after = svc.find(&playlist.id).await.unwrap();
        assert!(after.video_refs.is_empty());
    }

    #[tokio::test]
    async fn missing_playlist_is_not_found_not_authorization() {
        let store = MemoryStore::default();
        let svc = service(&store);
        let owner = OwnerId::from("u1");
        let video = seed_video(&store, "v1", "u1").await;

        let err = svc
            .add_video(&PlaylistId::from("nope"), &video, &owner)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound { resource: "playlist", .. }
        ));
    }

    #[tokio::test]
    async fn remove_of_absent_membership_is_a_successful_noop() {
        let store = MemoryStore::default();
        let svc = service(&store);
        let owner = OwnerId::from("u1");

        let video = seed_video(&store, "v1", "u1").await;
        let playlist = svc.create(&owner, "Watch later", None).await.unwrap();

        let state = svc
            .remove_video(&playlist.id, &video, &owner)
            .await
            .unwrap();
        assert!(state.video_refs.is_empty());
    }

    #[tokio::test]
    async fn dangling_references_can_still_be_removed() {
        let store = MemoryStore::default();
        let svc = service(&store);
        let owner = OwnerId::from("u1");

        let video = seed_video(&store, "v1", "u1").await;
        let playlist = svc.create(&owner, "Watch later", None).await.unwrap();
        svc.add_video(&playlist.id, &video, &owner).await.unwrap();

        // The video disappears; the membership entry stays dangling.
        store
            .conditional_delete_video(&video, &owner)
            .await
            .unwrap()
            .unwrap();
        assert!(svc.find(&playlist.id).await.unwrap().contains(&video));

        let after = svc
            .remove_video(&playlist.id, &video, &owner)
            .await
            .unwrap();
        assert!(after.video_refs.is_empty());
    }

    #[tokio::test]
    async fn interleaved_adds_and_removes_converge() {
        let store = MemoryStore::default();
        let svc = service(&store);
        let owner = OwnerId::from("u1");

        let a = seed_video(&store, "va", "u1").await;
        let b = seed_video(&store, "vb", "u1").await;
        let playlist = svc.create(&owner, "Mix", None).await.unwrap();

        svc.add_video(&playlist.id, &a, &owner).await.unwrap();
        svc.add_video(&playlist.id, &b, &owner).await.unwrap();
        svc.add_video(&playlist.id, &a, &owner).await.unwrap();
        svc.remove_video(&playlist.id, &a, &owner).await.unwrap();
        svc.remove_video(&playlist.id, &a, &owner).await.unwrap();
        let last = svc.add_video(&playlist.id, &a, &owner).await.unwrap();

        // Set semantics with insertion order: b survived, a re-enters last.
        assert_eq!(last.video_refs, vec![b, a]);
    }

    #[tokio::test]
    async fn update_requires_at_least_one_field() {
        let store = MemoryStore::default();
        let svc = service(&store);
        let owner = OwnerId::from("u1");
        let playlist = svc.create(&owner, "Old name", None).await.unwrap();

        let err = svc
            .update(&playlist.id, &owner, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));

        let err = svc
            .update(&playlist.id, &owner, Some("  "), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "name", .. }));

        let renamed = svc
            .update(&playlist.id, &owner, Some(" New name "), Some(" notes "))
            .await
            .unwrap();
        assert_eq!(renamed.name, "New name");
        assert_eq!(renamed.description, "notes");
    }

    #[tokio::test]
    async fn delete_is_owner_gated() {
        let store = MemoryStore::default();
        let svc = service(&store);
        let owner = OwnerId::from("u1");
        let playlist = svc.create(&owner, "Mine", None).await.unwrap();

        let err = svc
            .delete(&playlist.id, &OwnerId::from("u2"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Authorization { .. }));

        svc.delete(&playlist.id, &owner).await.unwrap();
        let err = svc.find(&playlist.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_for_owner_returns_only_their_playlists() {
        let store = MemoryStore::default();
        let svc = service(&store);

        svc.create(&OwnerId::from("u1"), "A", None).await.unwrap();
        svc.create(&OwnerId::from("u1"), "B", None).await.unwrap();
        svc.create(&OwnerId::from("u2"), "C", None).await.unwrap();

        let mine = svc.list_for_owner(&OwnerId::from("u1")).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|p| p.owner == OwnerId::from("u1")));
    }
}
