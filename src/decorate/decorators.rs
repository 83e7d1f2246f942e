//! Decorator trait, reading-progress decorator and the decoration pass

use super::pool::{run_bounded, try_run_bounded};
use crate::decode::{PageDecoder, ReviewPageDecoder};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClient;
use crate::normalize::{CanonicalItem, ReadingProgress};
use crate::pagination::{endpoint, DEFAULT_BASE_URL};
use crate::retry::{execute_with_retry_if, RetryPolicy};
use crate::types::OnError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Per-request timeout for single-review pages
pub const DEFAULT_PROGRESS_TIMEOUT: Duration = Duration::from_millis(2000);

/// Attempts per single-review page
pub const DEFAULT_PROGRESS_RETRIES: u32 = 5;

/// Fetches reading progress for one item
#[async_trait]
pub trait ItemDecorator: Send + Sync {
    /// Fetch the reading progress of `item`
    async fn decorate(&self, item: &CanonicalItem) -> Result<ReadingProgress>;
}

/// Reads shelves and the reading timeline from `/review/show/{id}`
#[derive(Debug, Clone)]
pub struct ReadingProgressFetcher {
    client: Arc<HttpClient>,
    base_url: String,
    decoder: ReviewPageDecoder,
    timeout: Duration,
    retry: RetryPolicy,
}

impl ReadingProgressFetcher {
    /// Create a new decorator against the public Goodreads origin
    pub fn new(client: Arc<HttpClient>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            decoder: ReviewPageDecoder::new()?,
            timeout: DEFAULT_PROGRESS_TIMEOUT,
            retry: RetryPolicy::new(DEFAULT_PROGRESS_RETRIES),
        })
    }

    /// Use a custom origin
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl ItemDecorator for ReadingProgressFetcher {
    async fn decorate(&self, item: &CanonicalItem) -> Result<ReadingProgress> {
        let review_id = item.review_id.as_str();
        let url = endpoint(&self.base_url, &["review", "show", review_id])?;
        let name = format!("fetch_reading_progress({review_id})");

        let body = execute_with_retry_if(
            &name,
            &self.retry,
            || self.client.get_text(&url, Some(self.timeout)),
            Error::is_retryable,
        )
        .await?;

        let page = self.decoder.decode(&body)?;
        debug!(
            "Review {review_id}: {} shelves, {} timeline events",
            page.shelves.len(),
            page.timeline.len()
        );

        Ok(ReadingProgress::from_page(review_id, page))
    }
}

/// Decorate every item, at most `concurrency` requests at a time.
///
/// Each distinct review id is fetched once and the result is attached to
/// every item carrying that id. Items without a review id are left as is.
/// Under `OnError::Fail` the first failure aborts the pass and names the
/// review; under `OnError::SkipAndLog` failed items stay undecorated.
pub async fn decorate_all<D>(
    items: &[CanonicalItem],
    decorator: &D,
    concurrency: usize,
    on_error: OnError,
) -> Result<Vec<CanonicalItem>>
where
    D: ItemDecorator + ?Sized,
{
    let start = Instant::now();

    let mut seen = HashSet::new();
    let unique: Vec<&CanonicalItem> = items
        .iter()
        .filter(|item| !item.review_id.is_empty() && seen.insert(item.review_id.as_str()))
        .collect();
    let requested = unique.len();

    let mut progress: HashMap<String, ReadingProgress> = HashMap::with_capacity(requested);
    match on_error {
        OnError::Fail => {
            let results = try_run_bounded(unique, concurrency, |item| async move {
                let (review_id, result) = decorate_one(decorator, item).await;
                result.map(|p| (review_id, p))
            })
            .await?;
            progress.extend(results);
        },
        OnError::SkipAndLog => {
            let results =
                run_bounded(unique, concurrency, |item| decorate_one(decorator, item)).await;
            for (review_id, result) in results {
                match result {
                    Ok(p) => {
                        progress.insert(review_id, p);
                    },
                    Err(e) => warn!("Leaving review {review_id} undecorated: {e}"),
                }
            }
        },
    }

    let elapsed = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let rate = if elapsed.is_zero() {
        0.0
    } else {
        progress.len() as f64 / elapsed.as_secs_f64()
    };
    info!(
        "Decorated {}/{requested} items in {}ms ({rate:.2}/s)",
        progress.len(),
        elapsed.as_millis()
    );

    Ok(items
        .iter()
        .map(|item| match progress.get(&item.review_id) {
            Some(p) => item.with_reading_progress(p.clone()),
            None => item.clone(),
        })
        .collect())
}

/// Decorate one item, naming the review in any error
async fn decorate_one<D>(decorator: &D, item: &CanonicalItem) -> (String, Result<ReadingProgress>)
where
    D: ItemDecorator + ?Sized,
{
    let review_id = item.review_id.clone();
    let result = decorator
        .decorate(item)
        .await
        .with_context(|| format!("fetch_reading_progress({review_id})"));
    (review_id, result)
}
