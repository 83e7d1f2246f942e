//! Pagination types
//!
//! Defines the page-level values passed between sources, fetchers and the engine.

use crate::types::Shelf;
use std::fmt;
use url::Url;

/// Identity of the thing being paginated
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    /// Goodreads user id
    pub user_id: String,
    /// Shelf being listed
    pub shelf: Shelf,
}

impl Resource {
    /// Create a new resource
    pub fn new(user_id: impl Into<String>, shelf: Shelf) -> Self {
        Self {
            user_id: user_id.into(),
            shelf,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shelf:{} user:{}", self.shelf, self.user_id)
    }
}

/// Everything needed to request one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    /// Fully built request URL
    pub target: Url,
    /// 1-based page number
    pub page_index: u32,
    /// Requested (maximum) number of items on the page
    pub page_size_hint: u32,
}

/// Items found on one fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    /// Items in page order
    pub items: Vec<T>,
    /// Title reported by the page, if the transport has one
    pub title: Option<String>,
}

impl<T> PageResult<T> {
    /// Create a page result from its items
    pub fn new(items: Vec<T>) -> Self {
        Self { items, title: None }
    }

    /// Create an empty page result
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Attach the page title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number of items on the page
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
