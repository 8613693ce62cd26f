use crate::error::{Error, Result};
use crate::model::Ticket;
use crate::sync::{FetchOptions, FetchProgress, IssueSource, PageRequest};

/// Fetch every child issue of an epic, page by page.
///
/// Requests `startAt = 0, n, 2n, ...` and stops once
/// `startAt + n >= total`, where `total` comes from the latest page, or
/// once a page comes back empty. Any failed page aborts the whole fetch;
/// nothing is retried.
pub async fn fetch_all_issues(
    source: &dyn IssueSource,
    epic_key: &str,
    options: &FetchOptions,
    progress: &dyn FetchProgress,
) -> Result<Vec<Ticket>> {
    if options.page_size == 0 {
        return Err(Error::Config("page size must be greater than zero".into()));
    }

    let page_size = u64::from(options.page_size);
    let mut start_at = 0u64;
    let mut issues = Vec::new();

    loop {
        let request = PageRequest {
            epic_key: epic_key.to_string(),
            start_at,
            page_size,
        };
        let page = source.search_page(&request).await?;

        log::info!(
            "Epic {epic_key}: fetched page startAt={} maxResults={} ({} issues, total {})",
            page.start_at,
            page.max_results,
            page.issues.len(),
            page.total
        );

        let empty = page.issues.is_empty();
        issues.extend(page.issues);
        progress.on_page_fetched(epic_key, issues.len(), page.total);

        if start_at + page_size >= page.total {
            break;
        }
        if empty {
            log::warn!(
                "Epic {epic_key}: empty page at startAt={start_at} with total {}; stopping",
                page.total
            );
            break;
        }
        start_at += page_size;
    }

    progress.on_complete(epic_key, issues.len());
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SearchPage;
    use crate::sync::NoopProgress;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves `total` generated issues in pages, recording every request.
    struct FakeSource {
        total: u64,
        /// Issues actually served; `total` may overstate it.
        available: u64,
        fail_at: Option<u64>,
        requests: Mutex<Vec<PageRequest>>,
    }

    impl FakeSource {
        fn new(total: u64) -> Self {
            Self {
                total,
                available: total,
                fail_at: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn starts(&self) -> Vec<u64> {
            self.requests.lock().unwrap().iter().map(|r| r.start_at).collect()
        }
    }

    #[async_trait]
    impl IssueSource for FakeSource {
        async fn search_page(&self, request: &PageRequest) -> Result<SearchPage> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail_at == Some(request.start_at) {
                return Err(Error::Api {
                    status: 401,
                    message: "Unauthorized".into(),
                });
            }
            let end = (request.start_at + request.page_size).min(self.available);
            let issues = (request.start_at.min(end)..end)
                .map(|i| Ticket {
                    key: format!("{}-{}", request.epic_key, i + 2),
                    ..Default::default()
                })
                .collect();
            Ok(SearchPage {
                start_at: request.start_at,
                max_results: request.page_size,
                total: self.total,
                issues,
            })
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        pages: Mutex<Vec<(usize, u64)>>,
        completed: Mutex<Option<usize>>,
    }

    impl FetchProgress for RecordingProgress {
        fn on_page_fetched(&self, _epic_key: &str, fetched: usize, total: u64) {
            self.pages.lock().unwrap().push((fetched, total));
        }

        fn on_complete(&self, _epic_key: &str, count: usize) {
            *self.completed.lock().unwrap() = Some(count);
        }
    }

    fn options(page_size: u32) -> FetchOptions {
        FetchOptions { page_size }
    }

    #[tokio::test]
    async fn test_collects_all_pages() {
        let source = FakeSource::new(120);
        let issues = fetch_all_issues(&source, "APP", &options(50), &NoopProgress)
            .await
            .unwrap();
        assert_eq!(issues.len(), 120);
        assert_eq!(source.starts(), vec![0, 50, 100]);
        assert_eq!(issues[0].key, "APP-2");
        assert_eq!(issues[119].key, "APP-121");
    }

    #[tokio::test]
    async fn test_exact_multiple_stops_without_extra_request() {
        let source = FakeSource::new(100);
        let issues = fetch_all_issues(&source, "APP", &options(50), &NoopProgress)
            .await
            .unwrap();
        assert_eq!(issues.len(), 100);
        assert_eq!(source.starts(), vec![0, 50]);
    }

    #[tokio::test]
    async fn test_empty_epic_makes_one_request() {
        let source = FakeSource::new(0);
        let issues = fetch_all_issues(&source, "APP", &options(50), &NoopProgress)
            .await
            .unwrap();
        assert!(issues.is_empty());
        assert_eq!(source.starts(), vec![0]);
    }

    #[tokio::test]
    async fn test_empty_page_stops_despite_inflated_total() {
        let mut source = FakeSource::new(1000);
        source.available = 60;
        let issues = fetch_all_issues(&source, "APP", &options(50), &NoopProgress)
            .await
            .unwrap();
        assert_eq!(issues.len(), 60);
        assert_eq!(source.starts(), vec![0, 50, 100]);
    }

    #[tokio::test]
    async fn test_failed_page_aborts() {
        let mut source = FakeSource::new(120);
        source.fail_at = Some(50);
        let err = fetch_all_issues(&source, "APP", &options(50), &NoopProgress)
            .await
            .unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(source.starts(), vec![0, 50]);
    }

    #[tokio::test]
    async fn test_zero_page_size_rejected() {
        let source = FakeSource::new(10);
        let result = fetch_all_issues(&source, "APP", &options(0), &NoopProgress).await;
        assert!(matches!(result, Err(Error::Config(_))));
        assert!(source.starts().is_empty());
    }

    #[tokio::test]
    async fn test_progress_reported_per_page() {
        let source = FakeSource::new(7);
        let progress = RecordingProgress::default();
        fetch_all_issues(&source, "APP", &options(3), &progress)
            .await
            .unwrap();
        assert_eq!(*progress.pages.lock().unwrap(), vec![(3, 7), (6, 7), (7, 7)]);
        assert_eq!(*progress.completed.lock().unwrap(), Some(7));
    }
}
