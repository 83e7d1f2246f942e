//! Canonical item types

use crate::decode::{ProgressPage, TimelineEvent};
use serde::{Deserialize, Serialize};

/// A shelf entry, independent of the transport it came from.
///
/// RSS items fill the feed fields; review-list rows fill the list fields.
/// String fields use `""` rather than `null` for missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalItem {
    /// Stable identifier used for joins and decoration merge-back
    pub review_id: String,
    pub id: String,
    pub title: String,
    pub link: String,
    pub book_id: String,
    #[serde(rename = "bookImageURL")]
    pub book_image_url: String,
    pub book_description: String,
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
    pub num_pages: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub series: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub read_count: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shelves: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_started_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_read_values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_progress: Option<ReadingProgress>,
}

impl CanonicalItem {
    /// Copy of this item carrying `progress`
    #[must_use]
    pub fn with_reading_progress(&self, progress: ReadingProgress) -> Self {
        Self {
            reading_progress: Some(progress),
            ..self.clone()
        }
    }
}

/// Reading progress of one review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingProgress {
    pub review_id: String,
    pub shelves: Vec<String>,
    pub timeline: Vec<TimelineEvent>,
}

impl ReadingProgress {
    /// Attach a decoded review page to its review id
    pub fn from_page(review_id: impl Into<String>, page: ProgressPage) -> Self {
        Self {
            review_id: review_id.into(),
            shelves: page.shelves,
            timeline: page.timeline,
        }
    }
}
