//! Fetcher trait and HTTP transports

use crate::decode::{PageDecoder, ReviewListDecoder, ReviewRow, RssDecoder, RssRecord};
use crate::error::Result;
use crate::http::HttpClient;
use crate::pagination::{PageDescriptor, PageResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Per-request timeout for feed pages
pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_millis(5000);

/// Per-request timeout for HTML review-list pages
pub const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Retrieves one page of raw items
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Raw record type produced by this transport
    type Item: Send;

    /// Fetch and decode the page at `descriptor`
    async fn fetch_page(&self, descriptor: &PageDescriptor) -> Result<PageResult<Self::Item>>;
}

// ============================================================================
// RSS
// ============================================================================

/// Fetches pages of the `list_rss` feed
#[derive(Debug, Clone)]
pub struct RssFetcher {
    client: Arc<HttpClient>,
    decoder: RssDecoder,
    timeout: Duration,
}

impl RssFetcher {
    /// Create a new feed fetcher
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            decoder: RssDecoder::new(),
            timeout: DEFAULT_FEED_TIMEOUT,
        }
    }

    /// Set the per-page timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl PageFetcher for RssFetcher {
    type Item = RssRecord;

    async fn fetch_page(&self, descriptor: &PageDescriptor) -> Result<PageResult<RssRecord>> {
        let body = self
            .client
            .get_text(&descriptor.target, Some(self.timeout))
            .await?;
        let channel = self.decoder.decode(&body)?;

        debug!(
            "Decoded feed page {} with {} items",
            descriptor.page_index,
            channel.items.len()
        );

        Ok(PageResult::new(channel.items).with_title(channel.title))
    }
}

// ============================================================================
// HTML
// ============================================================================

/// Fetches pages of the HTML review list.
///
/// With a session cookie the page must render signed in; a signed-out
/// page means the cookie was rejected and fails with `Error::Auth`.
#[derive(Debug, Clone)]
pub struct HtmlFetcher {
    client: Arc<HttpClient>,
    decoder: ReviewListDecoder,
    timeout: Duration,
}

impl HtmlFetcher {
    /// Create a new review-list fetcher
    pub fn new(client: Arc<HttpClient>) -> Result<Self> {
        let decoder = ReviewListDecoder::new()?.with_shelves(client.auth().is_authenticated());
        Ok(Self {
            client,
            decoder,
            timeout: DEFAULT_LIST_TIMEOUT,
        })
    }

    /// Set the per-page timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl PageFetcher for HtmlFetcher {
    type Item = ReviewRow;

    async fn fetch_page(&self, descriptor: &PageDescriptor) -> Result<PageResult<ReviewRow>> {
        let body = self
            .client
            .get_text(&descriptor.target, Some(self.timeout))
            .await?;

        self.client.auth().verify_signed_in(&body)?;

        let rows = self.decoder.decode(&body)?;

        debug!(
            "Decoded list page {} with {} rows",
            descriptor.page_index,
            rows.len()
        );

        Ok(PageResult::new(rows))
    }
}
