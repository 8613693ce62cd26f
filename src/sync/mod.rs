pub mod fetcher;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::SearchPage;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Options controlling how an epic's issues are fetched.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub page_size: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Request for one page of an epic's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub epic_key: String,
    pub start_at: u64,
    pub page_size: u64,
}

/// Something that can return pages of an epic's issues, usually
/// [`crate::jira::JiraClient`].
#[async_trait]
pub trait IssueSource: Send + Sync {
    async fn search_page(&self, request: &PageRequest) -> Result<SearchPage>;
}

/// Observer for fetch progress.
pub trait FetchProgress: Send + Sync {
    fn on_page_fetched(&self, _epic_key: &str, _fetched: usize, _total: u64) {}
    fn on_complete(&self, _epic_key: &str, _count: usize) {}
}

/// A progress observer that ignores everything.
pub struct NoopProgress;

impl FetchProgress for NoopProgress {}
