//! Page source implementations
//!
//! Each source builds request URLs for one kind of Goodreads listing.

use super::types::{PageDescriptor, Resource};
use crate::error::{Error, Result};
use crate::types::Shelf;
use url::Url;

/// Default Goodreads origin
pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com";

/// Items per review-list page unless configured otherwise
const DEFAULT_LIST_PAGE_SIZE: u32 = 100;

/// The RSS feed never returns more than this many items per page
const FEED_PAGE_SIZE: u32 = 100;

/// Produces page descriptors for a resource
pub trait PageSource: Send + Sync {
    /// The resource being paginated
    fn resource(&self) -> &Resource;

    /// Maximum items expected on a full page
    fn page_size_hint(&self) -> u32;

    /// Build the descriptor for a 1-based page index
    fn descriptor(&self, page_index: u32) -> PageDescriptor;

    /// Iterator over descriptors, starting at page 1
    fn pages(&self) -> Pages<'_, Self>
    where
        Self: Sized,
    {
        Pages::new(self)
    }
}

/// Pull-based iterator over a source's pages.
///
/// The consumer decides when to stop. The only built-in end is after page
/// `u32::MAX`, so no index is ever handed out twice.
#[derive(Debug)]
pub struct Pages<'a, S> {
    source: &'a S,
    next_index: Option<u32>,
}

impl<'a, S: PageSource> Pages<'a, S> {
    /// Start iterating at page 1
    pub fn new(source: &'a S) -> Self {
        Self::starting_at(source, 1)
    }

    /// Start iterating at `page_index`
    pub fn starting_at(source: &'a S, page_index: u32) -> Self {
        Self {
            source,
            next_index: Some(page_index),
        }
    }
}

impl<S: PageSource> Iterator for Pages<'_, S> {
    type Item = PageDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index?;
        self.next_index = index.checked_add(1);
        Some(self.source.descriptor(index))
    }
}

/// Build `{base}/{segments...}` with each segment percent-encoded
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|()| Error::invalid_value("base_url", format!("'{base_url}' cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn require_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::missing_field("user_id"));
    }
    Ok(())
}

fn require_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 {
        return Err(Error::invalid_value("page_size", "must be greater than 0"));
    }
    Ok(())
}

// ============================================================================
// Review List Pages
// ============================================================================

/// HTML review list: `/review/list/{user}?shelf=..&page=..&per_page=..`
///
/// Sorting is pinned to `date_added` descending, which is the only order
/// Goodreads honours for signed-out visitors, so signed-in and signed-out
/// listings page identically.
#[derive(Debug, Clone)]
pub struct ShelfListSource {
    resource: Resource,
    endpoint: Url,
    per_page: u32,
}

impl ShelfListSource {
    /// Create a source against the public Goodreads origin
    pub fn new(user_id: impl Into<String>, shelf: Shelf) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, user_id, shelf)
    }

    /// Create a source against a custom origin
    pub fn with_base_url(base_url: &str, user_id: impl Into<String>, shelf: Shelf) -> Result<Self> {
        let user_id = user_id.into();
        require_user_id(&user_id)?;
        let endpoint = endpoint(base_url, &["review", "list", &user_id])?;

        Ok(Self {
            resource: Resource::new(user_id, shelf),
            endpoint,
            per_page: DEFAULT_LIST_PAGE_SIZE,
        })
    }

    /// Set the requested page size
    pub fn with_page_size(mut self, per_page: u32) -> Result<Self> {
        require_page_size(per_page)?;
        self.per_page = per_page;
        Ok(self)
    }
}

impl PageSource for ShelfListSource {
    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn page_size_hint(&self) -> u32 {
        self.per_page
    }

    fn descriptor(&self, page_index: u32) -> PageDescriptor {
        let mut target = self.endpoint.clone();
        target
            .query_pairs_mut()
            .append_pair("shelf", self.resource.shelf.as_str())
            .append_pair("page", &page_index.to_string())
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("sort", "date_added")
            .append_pair("order", "d")
            .append_pair("utf8", "✓");

        PageDescriptor {
            target,
            page_index,
            page_size_hint: self.per_page,
        }
    }
}

// ============================================================================
// RSS Feed Pages
// ============================================================================

/// Review RSS feed: `/review/list_rss/{user}?key=..&shelf=..&page=..`
#[derive(Clone)]
pub struct FeedSource {
    resource: Resource,
    endpoint: Url,
    key: String,
    page_size: u32,
}

impl FeedSource {
    /// Create a source against the public Goodreads origin
    pub fn new(user_id: impl Into<String>, key: impl Into<String>, shelf: Shelf) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, user_id, key, shelf)
    }

    /// Create a source against a custom origin
    pub fn with_base_url(
        base_url: &str,
        user_id: impl Into<String>,
        key: impl Into<String>,
        shelf: Shelf,
    ) -> Result<Self> {
        let user_id = user_id.into();
        require_user_id(&user_id)?;
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::missing_field("key"));
        }
        let endpoint = endpoint(base_url, &["review", "list_rss", &user_id])?;

        Ok(Self {
            resource: Resource::new(user_id, shelf),
            endpoint,
            key,
            page_size: FEED_PAGE_SIZE,
        })
    }

    /// Override the expected page size (the feed itself ignores it)
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        require_page_size(page_size)?;
        self.page_size = page_size;
        Ok(self)
    }
}

impl std::fmt::Debug for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSource")
            .field("resource", &self.resource)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl PageSource for FeedSource {
    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn page_size_hint(&self) -> u32 {
        self.page_size
    }

    fn descriptor(&self, page_index: u32) -> PageDescriptor {
        let mut target = self.endpoint.clone();
        target
            .query_pairs_mut()
            .append_pair("key", &self.key)
            .append_pair("shelf", self.resource.shelf.as_str())
            .append_pair("page", &page_index.to_string());

        PageDescriptor {
            target,
            page_index,
            page_size_hint: self.page_size,
        }
    }
}
