//! Tests for engine module

use super::*;
use crate::pagination::{PageDescriptor, PageResult, Resource, TerminationReason};
use crate::retry::RetryPolicy;
use crate::types::Shelf;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

// ============================================================================
// Stubs
// ============================================================================

struct StubSource {
    resource: Resource,
    page_size: u32,
}

impl StubSource {
    fn new(page_size: u32) -> Self {
        Self {
            resource: Resource::new("1", Shelf::Read),
            page_size,
        }
    }
}

impl PageSource for StubSource {
    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn page_size_hint(&self) -> u32 {
        self.page_size
    }

    fn descriptor(&self, page_index: u32) -> PageDescriptor {
        PageDescriptor {
            target: Url::parse(&format!("http://stub.invalid/page/{page_index}")).unwrap(),
            page_index,
            page_size_hint: self.page_size,
        }
    }
}

/// Serves scripted pages; pages past the script are empty, or full when
/// `endless` is set.
#[derive(Default)]
struct StubFetcher {
    pages: Vec<Vec<u32>>,
    endless: Option<u32>,
    titles: HashMap<u32, String>,
    /// Page -> number of leading attempts that time out
    flaky: HashMap<u32, u32>,
    /// Pages that fail with a non-retryable status
    missing: Vec<u32>,
    calls: Mutex<Vec<u32>>,
}

impl StubFetcher {
    fn scripted(pages: Vec<Vec<u32>>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    fn endless(page_size: u32) -> Self {
        Self {
            endless: Some(page_size),
            ..Default::default()
        }
    }

    fn flaky(mut self, page: u32, failures: u32) -> Self {
        self.flaky.insert(page, failures);
        self
    }

    fn title(mut self, page: u32, title: &str) -> Self {
        self.titles.insert(page, title.to_string());
        self
    }

    fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_for(&self, page: u32) -> usize {
        self.calls().iter().filter(|p| **p == page).count()
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    type Item = u32;

    async fn fetch_page(&self, descriptor: &PageDescriptor) -> Result<PageResult<u32>> {
        let page = descriptor.page_index;
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(page);
            calls.iter().filter(|p| **p == page).count() as u32
        };

        if self.missing.contains(&page) {
            return Err(Error::http_status(404, "not found"));
        }
        if attempt <= self.flaky.get(&page).copied().unwrap_or(0) {
            return Err(Error::Timeout { timeout_ms: 5000 });
        }

        let items = match self.endless {
            Some(size) => (0..size).map(|i| page * 1000 + i).collect(),
            None => self
                .pages
                .get(page as usize - 1)
                .cloned()
                .unwrap_or_default(),
        };

        let mut result = PageResult::new(items);
        if let Some(title) = self.titles.get(&page) {
            result = result.with_title(title.clone());
        }
        Ok(result)
    }
}

/// Turns `n` into an item with review id `n`; `0` is malformed
struct StubNormalizer;

impl ItemNormalizer<u32> for StubNormalizer {
    fn normalize(&self, raw: u32) -> Result<CanonicalItem> {
        if raw == 0 {
            return Err(Error::validation("reviewId", "empty"));
        }
        Ok(CanonicalItem {
            review_id: raw.to_string(),
            ..Default::default()
        })
    }
}

/// Options matching `StubSource::new(2)`
fn options() -> FetchOptions {
    FetchOptions::default()
        .with_page_size(2)
        .with_retry(RetryPolicy::immediate(5))
}

fn ids(items: &[CanonicalItem]) -> Vec<String> {
    items.iter().map(|i| i.review_id.clone()).collect()
}

// ============================================================================
// FetchOptions Tests
// ============================================================================

#[test]
fn test_fetch_options_default() {
    let options = FetchOptions::default();
    assert_eq!(options.max_retries(), 5);
    assert_eq!(options.max_pages, -1);
    assert_eq!(options.page_size, 100);
    assert_eq!(options.concurrency, 3);
    assert_eq!(options.on_error, OnError::Fail);
    assert!(options.validate().is_ok());
}

#[test]
fn test_fetch_options_validate() {
    let bad = [
        FetchOptions::default().with_max_retries(0),
        FetchOptions::default().with_page_size(0),
        FetchOptions::default().with_concurrency(0),
        FetchOptions::default().with_max_pages(-2),
    ];
    for options in bad {
        assert!(
            matches!(options.validate(), Err(Error::InvalidConfigValue { .. })),
            "{options:?} should be rejected"
        );
    }
    assert!(FetchOptions::default().with_max_pages(0).validate().is_ok());
}

#[test]
fn test_fetch_options_yaml_defaults() {
    let options: FetchOptions = serde_yaml::from_str("max_pages: 2\nretry:\n  max_retries: 3\n").unwrap();
    assert_eq!(options.max_pages, 2);
    assert_eq!(options.max_retries(), 3);
    assert_eq!(options.page_size, 100);
}

#[test]
fn test_session_observe_title() {
    let mut session = FetchSession::new();
    assert_eq!(session.observe_title(None), None);
    assert_eq!(session.observe_title(Some(String::new())), None);
    assert_eq!(session.observe_title(Some("A".to_string())), None);
    assert_eq!(session.observe_title(Some("A".to_string())), None);
    assert_eq!(
        session.observe_title(Some("B".to_string())),
        Some("A".to_string())
    );
    assert_eq!(session.title.as_deref(), Some("A"));
}

// ============================================================================
// Pagination Tests
// ============================================================================

#[tokio::test]
async fn test_items_accumulate_in_page_order() {
    let fetcher = StubFetcher::scripted(vec![vec![1, 2], vec![3, 4], vec![5]]);
    let engine = PaginationEngine::new(fetcher, StubNormalizer).with_options(options());

    let session = engine.fetch_session(&StubSource::new(2)).await.unwrap();

    assert_eq!(ids(&session.items), vec!["1", "2", "3", "4", "5"]);
    assert_eq!(session.pages_fetched, 3);
    assert!(session.terminated);
    assert_eq!(session.termination_reason, Some(TerminationReason::ShortPage));
    assert_eq!(engine.fetcher.calls(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_empty_page_terminates() {
    let fetcher = StubFetcher::scripted(vec![vec![1, 2], vec![3, 4]]);
    let engine = PaginationEngine::new(fetcher, StubNormalizer).with_options(options());

    let session = engine.fetch_session(&StubSource::new(2)).await.unwrap();

    assert_eq!(ids(&session.items), vec!["1", "2", "3", "4"]);
    assert_eq!(session.pages_fetched, 3);
    assert_eq!(session.termination_reason, Some(TerminationReason::Empty));
}

#[tokio::test]
async fn test_empty_first_page() {
    let engine = PaginationEngine::new(StubFetcher::scripted(vec![]), StubNormalizer)
        .with_options(options());

    let items = engine.fetch_all(&StubSource::new(2)).await.unwrap();

    assert!(items.is_empty());
    assert_eq!(engine.fetcher.calls(), vec![1]);
}

#[tokio::test]
async fn test_max_pages_caps_full_pages() {
    let engine = PaginationEngine::new(StubFetcher::endless(3), StubNormalizer)
        .with_options(options().with_page_size(3).with_max_pages(4));

    let session = engine.fetch_session(&StubSource::new(3)).await.unwrap();

    assert_eq!(session.pages_fetched, 4);
    assert_eq!(session.item_count(), 12);
    assert_eq!(session.termination_reason, Some(TerminationReason::MaxPages));
    assert_eq!(engine.fetcher.calls(), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_zero_max_pages_fetches_one_page() {
    let engine = PaginationEngine::new(StubFetcher::endless(3), StubNormalizer)
        .with_options(options().with_page_size(3).with_max_pages(0));

    let session = engine.fetch_session(&StubSource::new(3)).await.unwrap();

    assert_eq!(session.pages_fetched, 1);
    assert_eq!(session.termination_reason, Some(TerminationReason::MaxPages));
}

#[tokio::test]
async fn test_invalid_options_fail_before_fetching() {
    let engine = PaginationEngine::new(StubFetcher::endless(3), StubNormalizer)
        .with_options(options().with_page_size(0));

    let err = engine.fetch_all(&StubSource::new(3)).await.unwrap_err();

    assert!(matches!(err, Error::InvalidConfigValue { .. }));
    assert!(engine.fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_page_size_mismatch_fails_before_fetching() {
    let engine = PaginationEngine::new(StubFetcher::endless(2), StubNormalizer)
        .with_options(options().with_max_pages(3));

    let err = engine.fetch_all(&StubSource::new(100)).await.unwrap_err();

    match err {
        Error::InvalidConfigValue { field, .. } => assert_eq!(field, "page_size"),
        other => panic!("expected invalid page size, got {other:?}"),
    }
    assert!(engine.fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_page_size_drives_termination() {
    let engine = PaginationEngine::new(StubFetcher::endless(2), StubNormalizer)
        .with_options(options().with_max_pages(3));

    let session = engine.fetch_session(&StubSource::new(2)).await.unwrap();

    assert_eq!(session.pages_fetched, 3);
    assert_eq!(session.termination_reason, Some(TerminationReason::MaxPages));
}

// ============================================================================
// Retry Tests
// ============================================================================

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let fetcher = StubFetcher::scripted(vec![vec![1, 2], vec![3, 4], vec![5]]).flaky(2, 2);
    let engine = PaginationEngine::new(fetcher, StubNormalizer).with_options(options());

    let session = engine.fetch_session(&StubSource::new(2)).await.unwrap();

    assert_eq!(ids(&session.items), vec!["1", "2", "3", "4", "5"]);
    assert_eq!(session.retries, 2);
    assert_eq!(engine.fetcher.calls_for(2), 3);
    assert_eq!(engine.fetcher.calls(), vec![1, 2, 2, 2, 3]);
}

#[tokio::test]
async fn test_retry_exhaustion_aborts_run() {
    let fetcher = StubFetcher::scripted(vec![vec![1, 2], vec![3, 4], vec![5]]).flaky(2, 99);
    let engine = PaginationEngine::new(fetcher, StubNormalizer).with_options(options());

    let err = engine.fetch_all(&StubSource::new(2)).await.unwrap_err();

    match &err {
        Error::Pagination {
            resource,
            page,
            attempts,
            source,
        } => {
            assert_eq!(resource, "shelf:read user:1");
            assert_eq!(*page, 2);
            assert_eq!(*attempts, 5);
            assert!(matches!(**source, Error::Timeout { .. }));
        }
        other => panic!("expected pagination error, got {other:?}"),
    }
    assert!(err.to_string().contains("page 2"));
    // Nothing past the failing page is requested
    assert_eq!(engine.fetcher.calls_for(3), 0);
}

#[tokio::test]
async fn test_non_retryable_failure_is_not_retried() {
    let mut fetcher = StubFetcher::scripted(vec![vec![1, 2], vec![3]]);
    fetcher.missing.push(1);
    let engine = PaginationEngine::new(fetcher, StubNormalizer).with_options(options());

    let err = engine.fetch_all(&StubSource::new(2)).await.unwrap_err();

    assert!(matches!(err, Error::Pagination { attempts: 1, page: 1, .. }));
    assert_eq!(engine.fetcher.calls(), vec![1]);
}

#[tokio::test]
async fn test_single_attempt_budget() {
    let fetcher = StubFetcher::scripted(vec![vec![1]]).flaky(1, 1);
    let engine = PaginationEngine::new(fetcher, StubNormalizer)
        .with_options(options().with_retry(RetryPolicy::immediate(1)));

    let err = engine.fetch_all(&StubSource::new(2)).await.unwrap_err();

    assert!(matches!(err, Error::Pagination { attempts: 1, .. }));
}

// ============================================================================
// Normalization Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_item_fails_by_default() {
    let fetcher = StubFetcher::scripted(vec![vec![1, 2], vec![0, 4], vec![5]]);
    let engine = PaginationEngine::new(fetcher, StubNormalizer).with_options(options());

    let err = engine.fetch_all(&StubSource::new(2)).await.unwrap_err();

    match err {
        Error::Pagination { page, source, .. } => {
            assert_eq!(page, 2);
            assert!(matches!(*source, Error::Validation { .. }));
        }
        other => panic!("expected pagination error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_item_skipped_when_configured() {
    let fetcher = StubFetcher::scripted(vec![vec![1, 2], vec![0, 4], vec![5]]);
    let engine = PaginationEngine::new(fetcher, StubNormalizer)
        .with_options(options().with_on_error(OnError::SkipAndLog));

    let session = engine.fetch_session(&StubSource::new(2)).await.unwrap();

    assert_eq!(ids(&session.items), vec!["1", "2", "4", "5"]);
    assert_eq!(session.skipped, 1);
    // Raw item count drives termination, so page 2 still counts as full
    assert_eq!(session.pages_fetched, 3);
}

// ============================================================================
// Title Tests
// ============================================================================

#[tokio::test]
async fn test_first_title_wins() {
    let fetcher = StubFetcher::scripted(vec![vec![1, 2], vec![3, 4], vec![5]])
        .title(1, "Shelf: read")
        .title(2, "Shelf: read")
        .title(3, "Shelf: renamed");
    let engine = PaginationEngine::new(fetcher, StubNormalizer).with_options(options());

    let session = engine.fetch_session(&StubSource::new(2)).await.unwrap();

    assert_eq!(session.title.as_deref(), Some("Shelf: read"));
    assert_eq!(session.item_count(), 5);
}
