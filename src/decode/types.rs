//! Decoder types and traits
//!
//! Defines the raw records produced by each decoder.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Trait for decoding response bodies
pub trait PageDecoder: Send + Sync {
    /// Decoded form of one response body
    type Output;

    /// Decode the response body
    fn decode(&self, body: &str) -> Result<Self::Output>;
}

// ============================================================================
// RSS
// ============================================================================

/// One `<channel>` of the shelf feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RssChannel {
    pub title: String,
    /// Empty when the channel has no `<item>` elements
    pub items: Vec<RssRecord>,
}

/// One `<item>` of the shelf feed, with every field as delivered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RssRecord {
    pub guid: String,
    pub pub_date: String,
    pub title: String,
    pub link: String,
    pub book_id: String,
    pub book_image_url: String,
    pub book_small_image_url: String,
    pub book_medium_image_url: String,
    pub book_large_image_url: String,
    pub book_description: String,
    /// `<book><num_pages>`
    pub num_pages: String,
    pub author_name: String,
    pub isbn: String,
    pub user_name: String,
    pub user_rating: String,
    pub user_read_at: String,
    pub user_date_added: String,
    pub user_date_created: String,
    pub user_shelves: String,
    pub user_review: String,
    pub average_rating: String,
    pub book_published: String,
    pub description: String,
    /// Fields absent from the item, in feed order
    pub missing: Vec<String>,
}

// ============================================================================
// HTML
// ============================================================================

/// One `<tr>` of the review-list table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewRow {
    /// Raw row id, e.g. `review_6309249800`
    pub id: String,
    pub review_id: String,
    pub title: String,
    pub series: String,
    pub author: String,
    pub read_count: String,
    /// Only present for signed-in pages
    pub shelves: Vec<String>,
    pub date_started_values: Vec<String>,
    pub date_read_values: Vec<String>,
}

/// One entry of a review's reading timeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: String,
    pub event: String,
}

/// What a single-review page says about reading progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressPage {
    pub shelves: Vec<String>,
    pub timeline: Vec<TimelineEvent>,
}
