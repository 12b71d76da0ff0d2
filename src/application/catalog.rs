//! Catalog query engine. Read-only.

use std::time::Duration;

use serde::Serialize;

use super::repo_call;
use crate::domain::catalog::{Video, VideoId};
use crate::domain::error::DomainError;
use crate::domain::query::CatalogQuery;
use crate::ports::repository::{VideoFilter, VideoRepository};

/// One stable page over the (mutable) video collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

pub struct CatalogService<R> {
    repo: R,
    call_timeout: Duration,
}

impl<R: VideoRepository> CatalogService<R> {
    pub fn new(repo: R, call_timeout: Duration) -> Self {
        Self { repo, call_timeout }
    }

    /// Execute a validated query spec. Either the full page is returned or
    /// the call fails; there are no partial results.
    ///
    /// The count phase and the fetch phase may observe different snapshots
    /// under concurrent writes. That window is accepted; within the fetch,
    /// ordering is deterministic because ties on the sort field are broken
    /// by id ascending.
    pub async fn page(&self, spec: &CatalogQuery) -> Result<Page<Video>, DomainError> {
        const OP: &str = "list_videos";

        let filter = VideoFilter {
            owner: spec.owner.clone(),
            is_published: spec.published.as_bool(),
        };

        // 1. Count matching documents.
        let total_count = repo_call(
            self.call_timeout,
            OP,
            "count",
            self.repo.count_videos(&filter),
        )
        .await?;

        // The validator guarantees limit >= 1, but the spec fields are
        // public; a hand-built spec must not divide by zero here.
        let limit = u64::from(spec.limit.max(1));
        let page = u64::from(spec.page.max(1));
        let total_pages = total_count.div_ceil(limit);

        // 2. Fetch the requested slice.
        let skip = (page - 1) * limit;
        let items = repo_call(
            self.call_timeout,
            OP,
            "fetch",
            self.repo
                .page_videos(&filter, spec.sort_field, spec.sort_direction, skip, limit),
        )
        .await?;

        Ok(Page {
            items,
            total_count,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1 && total_pages > 0,
        })
    }

    /// Single-record lookup by id.
    pub async fn find_video(&self, id: &VideoId) -> Result<Video, DomainError> {
        repo_call(
            self.call_timeout,
            "get_video",
            "find",
            self.repo.find_video(id),
        )
        .await?
        .ok_or_else(|| DomainError::not_found("video", id.as_str()))
    }
}
