//! In-memory asset store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::domain::catalog::AssetRef;
use crate::ports::assets::{AssetKind, AssetStore, AssetStoreError, StoredAsset};

/// Keyed byte map. Cannot probe media, so video uploads report no duration.
#[derive(Clone, Default)]
pub struct MemoryAssetStore {
    inner: Arc<RwLock<HashMap<AssetRef, Bytes>>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, asset_ref: &AssetRef) -> bool {
        self.inner.read().await.contains_key(asset_ref)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn put(&self, bytes: Bytes, _kind: AssetKind) -> Result<StoredAsset, AssetStoreError> {
        let asset_ref = AssetRef::new();
        self.inner.write().await.insert(asset_ref.clone(), bytes);
        Ok(StoredAsset {
            asset_ref,
            duration_seconds: None,
        })
    }

    async fn delete(&self, asset_ref: &AssetRef) -> Result<(), AssetStoreError> {
        // Absent refs are fine; delete is idempotent by contract.
        self.inner.write().await.remove(asset_ref);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_delete_is_idempotent() {
        let store = MemoryAssetStore::new();
        let stored = store
            .put(Bytes::from_static(b"abc"), AssetKind::Thumbnail)
            .await
            .unwrap();
        assert!(store.contains(&stored.asset_ref).await);

        store.delete(&stored.asset_ref).await.unwrap();
        assert!(!store.contains(&stored.asset_ref).await);

        // Second delete of the same ref is still success.
        store.delete(&stored.asset_ref).await.unwrap();
        assert!(store.is_empty().await);
    }
}
