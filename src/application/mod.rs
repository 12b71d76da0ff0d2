//! Generic services over the collaborator ports.
//!
//! Each inbound operation runs as an independent unit of work; there is no
//! cooperative ordering between concurrent callers and no in-process locking.
//! Every external call goes through the bounded-timeout wrappers below, so a
//! hung collaborator surfaces as a dependency error instead of a stuck task.

pub mod catalog;
pub mod media;
pub mod playlists;

use std::future::Future;
use std::time::Duration;

use crate::domain::catalog::AssetRef;
use crate::domain::error::DomainError;
use crate::ports::assets::AssetStoreError;
use crate::ports::repository::RepositoryError;

/// Run a persistence call under the configured deadline and map its failures
/// into the domain taxonomy. Uniqueness violations become conflicts; anything
/// else (including the timeout) is a dependency failure.
pub(crate) async fn repo_call<T>(
    limit: Duration,
    operation: &'static str,
    step: &'static str,
    fut: impl Future<Output = Result<T, RepositoryError>>,
) -> Result<T, DomainError> {
    match tokio::time::timeout(limit, fut).await {
        Err(_) => Err(DomainError::dependency(
            operation,
            step,
            Vec::new(),
            "persistence call timed out",
        )),
        Ok(Err(RepositoryError::UniqueViolation { collection, detail })) => {
            Err(DomainError::Conflict {
                resource: collection,
                detail,
            })
        }
        Ok(Err(err)) => Err(DomainError::dependency(
            operation,
            step,
            Vec::new(),
            err.to_string(),
        )),
        Ok(Ok(value)) => Ok(value),
    }
}

/// Run an asset-store call under the configured deadline. `asset_refs` names
/// the objects the caller is operating on so a failure stays remediable.
pub(crate) async fn asset_call<T>(
    limit: Duration,
    operation: &'static str,
    step: &'static str,
    asset_refs: Vec<AssetRef>,
    fut: impl Future<Output = Result<T, AssetStoreError>>,
) -> Result<T, DomainError> {
    match tokio::time::timeout(limit, fut).await {
        Err(_) => Err(DomainError::dependency(
            operation,
            step,
            asset_refs,
            "asset store call timed out",
        )),
        Ok(Err(err)) => Err(DomainError::dependency(
            operation,
            step,
            asset_refs,
            err.to_string(),
        )),
        Ok(Ok(value)) => Ok(value),
    }
}
