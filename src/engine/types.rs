//! Engine types
//!
//! Configuration and per-run state for the pagination engine.

use crate::error::{Error, Result};
use crate::normalize::CanonicalItem;
use crate::pagination::TerminationReason;
use crate::retry::RetryPolicy;
use crate::types::OnError;
use serde::{Deserialize, Serialize};

/// Configuration for a fetch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Page cap; negative means no cap
    pub max_pages: i64,
    /// Items requested per page
    pub page_size: u32,
    /// In-flight limit for the decoration pass
    pub concurrency: usize,
    /// What to do with items that fail normalization or decoration
    pub on_error: OnError,
    /// Per-page retry budget and backoff
    pub retry: RetryPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_pages: -1,
            page_size: 100,
            concurrency: 3,
            on_error: OnError::Fail,
            retry: RetryPolicy::default(),
        }
    }
}

impl FetchOptions {
    /// Create default fetch options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cap (-1 for none)
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: i64) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set items per page
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set decoration concurrency
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-item error mode
    #[must_use]
    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set only the attempt budget
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    /// Attempts per page, including the first
    pub fn max_retries(&self) -> u32 {
        self.retry.max_retries
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_retries == 0 {
            return Err(Error::invalid_value("max_retries", "must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }
        if self.concurrency == 0 {
            return Err(Error::invalid_value("concurrency", "must be at least 1"));
        }
        if self.max_pages < -1 {
            return Err(Error::invalid_value(
                "max_pages",
                format!("must be -1 (unbounded) or a page count, got {}", self.max_pages),
            ));
        }
        if self.retry.initial_backoff > self.retry.max_backoff {
            return Err(Error::invalid_value(
                "initial_backoff",
                "must not exceed max_backoff",
            ));
        }
        Ok(())
    }
}

/// State of one engine invocation
#[derive(Debug, Clone, Default)]
pub struct FetchSession {
    /// Pages fetched successfully
    pub pages_fetched: u32,
    /// Normalized items in page order
    pub items: Vec<CanonicalItem>,
    /// Whether the termination policy ended the run
    pub terminated: bool,
    /// Why the run ended
    pub termination_reason: Option<TerminationReason>,
    /// First non-empty page title
    pub title: Option<String>,
    /// Failed attempts that were retried successfully
    pub retries: u32,
    /// Items dropped under `OnError::SkipAndLog`
    pub skipped: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl FetchSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items accumulated so far
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Record the title of a fetched page.
    ///
    /// The first non-empty title wins; returns the previous title when a
    /// later page reports a different one.
    pub fn observe_title(&mut self, title: Option<String>) -> Option<String> {
        let title = title.filter(|t| !t.is_empty())?;
        match &self.title {
            None => {
                self.title = Some(title);
                None
            }
            Some(current) if *current != title => Some(current.clone()),
            Some(_) => None,
        }
    }

    /// Take the accumulated items
    pub fn into_items(self) -> Vec<CanonicalItem> {
        self.items
    }
}
