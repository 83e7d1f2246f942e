//! Feed document

use crate::engine::FetchSession;
use crate::normalize::CanonicalItem;
use serde::{Deserialize, Serialize};

/// The persisted result of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    pub items: Vec<CanonicalItem>,
}

impl Feed {
    /// Create a feed
    pub fn new(title: impl Into<String>, items: Vec<CanonicalItem>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    /// Build a feed from a finished session; an untitled session gets `""`
    pub fn from_session(session: FetchSession) -> Self {
        Self {
            title: session.title.unwrap_or_default(),
            items: session.items,
        }
    }

    /// Keep at most `max_items` items; negative keeps everything
    #[must_use]
    pub fn truncated(mut self, max_items: i64) -> Self {
        if let Ok(max) = usize::try_from(max_items) {
            self.items.truncate(max);
        }
        self
    }

    /// Same feed with different items
    #[must_use]
    pub fn with_items(&self, items: Vec<CanonicalItem>) -> Self {
        Self {
            title: self.title.clone(),
            items,
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the feed has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
