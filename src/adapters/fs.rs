//! Filesystem asset store.
//!
//! Stores each object as a file named by its ref under one root directory.
//! Like the in-memory store it cannot probe media, so uploads report no
//! duration; a production deployment points the media service at a real
//! asset store instead.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::catalog::AssetRef;
use crate::ports::assets::{AssetKind, AssetStore, AssetStoreError, StoredAsset};

#[derive(Clone, Debug)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, asset_ref: &AssetRef) -> PathBuf {
        self.root.join(asset_ref.as_str())
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn put(&self, bytes: Bytes, _kind: AssetKind) -> Result<StoredAsset, AssetStoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let asset_ref = AssetRef::new();
        tokio::fs::write(self.path_for(&asset_ref), &bytes).await?;
        Ok(StoredAsset {
            asset_ref,
            duration_seconds: None,
        })
    }

    async fn delete(&self, asset_ref: &AssetRef) -> Result<(), AssetStoreError> {
        match tokio::fs::remove_file(self.path_for(asset_ref)).await {
            Ok(()) => Ok(()),
            // Deleting a missing ref is success; retried compensation
            // depends on it.
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_reads_back_and_deletes() {
        let dir = tempdir().unwrap();
        let store = FsAssetStore::new(dir.path());

        let stored = store
            .put(Bytes::from_static(b"frame data"), AssetKind::Video)
            .await
            .unwrap();
        let on_disk = std::fs::read(dir.path().join(stored.asset_ref.as_str())).unwrap();
        assert_eq!(on_disk, b"frame data");

        store.delete(&stored.asset_ref).await.unwrap();
        assert!(!dir.path().join(stored.asset_ref.as_str()).exists());
    }

    #[tokio::test]
    async fn deleting_a_missing_ref_is_success() {
        let dir = tempdir().unwrap();
        let store = FsAssetStore::new(dir.path());
        store.delete(&AssetRef::from("never-stored")).await.unwrap();
    }
}
