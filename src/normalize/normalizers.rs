//! Normalizer implementations

use super::types::CanonicalItem;
use crate::decode::{ReviewRow, RssRecord};
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use url::Url;

/// Maps one raw record onto a canonical item
pub trait ItemNormalizer<R>: Send + Sync {
    /// Normalize a raw record
    fn normalize(&self, raw: R) -> Result<CanonicalItem>;
}

// ============================================================================
// Field helpers
// ============================================================================

/// Convert a feed date to ISO-8601 UTC with milliseconds.
///
/// Accepts RFC 2822 (`Sun, 3 Jul 2022 00:00:00 +0000`), RFC 3339 and bare
/// `YYYY-MM-DD` dates (taken as midnight UTC). Anything else becomes `""`.
pub fn safe_date(value: &str) -> String {
    let value = value.trim();

    let parsed = DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        });

    parsed
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Integer fields: anything that is not an integer becomes `"0"`
pub fn safe_int_as_string(value: &str) -> String {
    value
        .trim()
        .parse::<i64>()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| "0".to_string())
}

/// Round the average rating to one decimal, and the copy of it embedded in
/// the description. Non-numeric ratings pass through untouched.
///
/// Returns `(rating, description)`.
pub fn round_average_rating(average_rating: &str, description: &str) -> (String, String) {
    let Ok(value) = average_rating.trim().parse::<f64>() else {
        return (average_rating.to_string(), description.to_string());
    };

    let rounded = format!("{value:.1}");
    let description = description.replacen(
        &format!("average rating: {average_rating}"),
        &format!("average rating: {rounded}"),
        1,
    );
    (rounded, description)
}

/// Review id from a feed guid such as
/// `https://www.goodreads.com/review/show/6309249800?utm_medium=api`
pub fn review_id_from_guid(guid: &str) -> Option<String> {
    let url = Url::parse(guid).ok()?;
    url.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

// ============================================================================
// RSS
// ============================================================================

/// Normalizes feed items
#[derive(Debug, Clone, Copy, Default)]
pub struct RssNormalizer;

impl RssNormalizer {
    /// Create a new RSS normalizer
    pub fn new() -> Self {
        Self
    }
}

impl ItemNormalizer<RssRecord> for RssNormalizer {
    fn normalize(&self, raw: RssRecord) -> Result<CanonicalItem> {
        if let Some(field) = raw.missing.first() {
            return Err(Error::validation(field.as_str(), "missing from feed"));
        }

        let review_id = review_id_from_guid(&raw.guid).ok_or_else(|| {
            Error::validation("guid", format!("no review id in guid {:?}", raw.guid))
        })?;

        let (average_rating, description) =
            round_average_rating(&raw.average_rating, &raw.description);

        Ok(CanonicalItem {
            review_id,
            id: raw.guid,
            title: raw.title,
            link: raw.link,
            book_id: raw.book_id,
            book_image_url: raw.book_image_url,
            book_description: raw.book_description,
            author_name: raw.author_name,
            isbn: raw.isbn,
            user_name: raw.user_name,
            user_rating: raw.user_rating,
            user_read_at: safe_date(&raw.user_read_at),
            user_date_added: safe_date(&raw.user_date_added),
            user_date_created: safe_date(&raw.user_date_created),
            user_shelves: raw.user_shelves,
            user_review: raw.user_review,
            average_rating,
            book_published: raw.book_published,
            description: description.trim().to_string(),
            num_pages: safe_int_as_string(&raw.num_pages),
            ..Default::default()
        })
    }
}

// ============================================================================
// Review list
// ============================================================================

/// Normalizes review-list rows
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewRowNormalizer;

impl ReviewRowNormalizer {
    /// Create a new review-row normalizer
    pub fn new() -> Self {
        Self
    }
}

impl ItemNormalizer<ReviewRow> for ReviewRowNormalizer {
    fn normalize(&self, raw: ReviewRow) -> Result<CanonicalItem> {
        if raw.review_id.trim().is_empty() {
            return Err(Error::validation(
                "reviewId",
                format!("row {:?} has no review id", raw.id),
            ));
        }

        Ok(CanonicalItem {
            review_id: raw.review_id,
            id: raw.id,
            title: raw.title,
            author_name: raw.author,
            series: raw.series,
            read_count: raw.read_count,
            shelves: raw.shelves,
            date_started_values: raw.date_started_values,
            date_read_values: raw.date_read_values,
            ..Default::default()
        })
    }
}
