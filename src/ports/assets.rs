//! Asset-store collaborator port.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

use crate::domain::catalog::AssetRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Video,
    Thumbnail,
}

/// What the store reports back for an uploaded object.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    pub asset_ref: AssetRef,
    /// Media duration probed by the store; only video uploads carry one.
    pub duration_seconds: Option<f64>,
}

#[derive(Debug)]
pub enum AssetStoreError {
    Unavailable(String),
    Rejected(String),
    Io(std::io::Error),
}

impl fmt::Display for AssetStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetStoreError::Unavailable(detail) => write!(f, "asset store unavailable: {}", detail),
            AssetStoreError::Rejected(detail) => write!(f, "asset rejected: {}", detail),
            AssetStoreError::Io(err) => write!(f, "asset io error: {}", err),
        }
    }
}

impl std::error::Error for AssetStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetStoreError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AssetStoreError {
    fn from(err: std::io::Error) -> Self {
        AssetStoreError::Io(err)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store one binary object and return its reference.
    async fn put(&self, bytes: Bytes, kind: AssetKind) -> Result<StoredAsset, AssetStoreError>;

    /// Delete an object. Deleting a reference that does not exist is also
    /// success; callers rely on this for retried compensation.
    async fn delete(&self, asset_ref: &AssetRef) -> Result<(), AssetStoreError>;
}
