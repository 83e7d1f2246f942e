//! Pagination engine module
//!
//! Main read loop over a paginated resource.
//!
//! # Overview
//!
//! The engine module provides:
//! - `PaginationEngine` - Pulls pages in order, retrying each, until the
//!   termination policy says stop
//! - `FetchOptions` - Configuration for a run
//! - `FetchSession` - What one run produced
//!
//! The engine is written once against `PageFetcher` and `ItemNormalizer`;
//! it never knows which transport backs a page.

mod types;

pub use types::{FetchOptions, FetchSession};

use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::normalize::{CanonicalItem, ItemNormalizer};
use crate::pagination::{check_termination, PageSource};
use crate::retry::execute_with_retry_if;
use crate::types::OnError;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Fetches every page of a source and normalizes the items
pub struct PaginationEngine<F, N> {
    /// Page transport
    fetcher: F,
    /// Raw item mapping
    normalizer: N,
    /// Run configuration
    options: FetchOptions,
}

impl<F, N> PaginationEngine<F, N>
where
    F: PageFetcher,
    N: ItemNormalizer<F::Item>,
{
    /// Create a new engine with default options
    pub fn new(fetcher: F, normalizer: N) -> Self {
        Self {
            fetcher,
            normalizer,
            options: FetchOptions::default(),
        }
    }

    /// Set fetch options
    #[must_use]
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Get fetch options
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetch every page and return the items in page order
    pub async fn fetch_all<S: PageSource>(&self, source: &S) -> Result<Vec<CanonicalItem>> {
        Ok(self.fetch_session(source).await?.into_items())
    }

    /// Fetch every page and return the items together with run state.
    ///
    /// The source's page size must equal `options.page_size`, since a
    /// shorter page ends the run.
    ///
    /// Retry exhaustion on any page aborts the run with
    /// `Error::Pagination`; no partial result is returned.
    pub async fn fetch_session<S: PageSource>(&self, source: &S) -> Result<FetchSession> {
        self.options.validate()?;
        if source.page_size_hint() != self.options.page_size {
            return Err(Error::invalid_value(
                "page_size",
                format!(
                    "source pages hold {} items but options expect {}",
                    source.page_size_hint(),
                    self.options.page_size
                ),
            ));
        }

        let start = Instant::now();
        let resource = source.resource().to_string();
        let mut session = FetchSession::new();

        info!("Starting fetch for {resource}");

        for descriptor in source.pages() {
            let page_start = Instant::now();
            let page_index = descriptor.page_index;
            let name = format!("fetch_page({resource},{page_index})");

            let mut attempts = 0u32;
            let result = execute_with_retry_if(
                &name,
                &self.options.retry,
                || {
                    attempts += 1;
                    self.fetcher.fetch_page(&descriptor)
                },
                Error::is_retryable,
            )
            .await;

            let page =
                result.map_err(|e| Error::pagination(resource.as_str(), page_index, attempts, e))?;

            session.pages_fetched += 1;
            session.retries += attempts.saturating_sub(1);

            if let Some(previous) = session.observe_title(page.title.clone()) {
                warn!(
                    "Title changed from {previous} to {} on page:{page_index}",
                    page.title.as_deref().unwrap_or_default()
                );
            }

            let item_count = page.item_count();
            for raw in page.items {
                match self.normalizer.normalize(raw) {
                    Ok(item) => session.items.push(item),
                    Err(e) => match self.options.on_error {
                        OnError::Fail => {
                            return Err(Error::pagination(
                                resource.as_str(),
                                page_index,
                                attempts,
                                e,
                            ));
                        }
                        OnError::SkipAndLog => {
                            warn!("Skipping item on page {page_index} of {resource}: {e}");
                            session.skipped += 1;
                        }
                    },
                }
            }

            info!(
                "page:{page_index} {resource} in {}ms items:{item_count}",
                page_start.elapsed().as_millis()
            );

            let reason = check_termination(item_count, &descriptor, self.options.max_pages);
            if reason.should_terminate() {
                debug!("Stopping after page {page_index}: {reason}");
                session.terminated = true;
                session.termination_reason = Some(reason);
                break;
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        session.duration_ms = duration_ms;

        info!(
            "Completed fetch for {resource}: {} items in {} pages ({} retries, {} skipped)",
            session.item_count(),
            session.pages_fetched,
            session.retries,
            session.skipped
        );

        Ok(session)
    }
}

#[cfg(test)]
mod tests;
