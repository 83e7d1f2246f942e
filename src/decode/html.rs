//! HTML decoders for review-list and single-review pages

use super::types::{PageDecoder, ProgressPage, ReviewRow, TimelineEvent};
use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Selector};

/// Separator between date and event in a timeline row (an en dash)
const TIMELINE_SEPARATOR: char = '\u{2013}';

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::html(format!("invalid selector {css}: {e:?}")))
}

/// Concatenated, trimmed text of every match below `element`
fn text_of(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Trimmed text of each match below `element`
fn texts_of(element: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    element
        .select(selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect()
}

/// Remove the last occurrence of `pattern` from `text`.
///
/// An empty pattern leaves `text` unchanged.
pub fn remove_last(text: &str, pattern: &str) -> String {
    if pattern.is_empty() {
        return text.to_string();
    }
    match text.rfind(pattern) {
        Some(index) => format!("{}{}", &text[..index], &text[index + pattern.len()..]),
        None => text.to_string(),
    }
}

// ============================================================================
// Review list
// ============================================================================

/// Decodes the `#booksBody` table of a `/review/list` page
#[derive(Debug, Clone)]
pub struct ReviewListDecoder {
    rows: Selector,
    title: Selector,
    series: Selector,
    author: Selector,
    read_count: Selector,
    shelves: Selector,
    date_started: Selector,
    date_read: Selector,
    include_shelves: bool,
}

impl ReviewListDecoder {
    /// Create a new review-list decoder
    pub fn new() -> Result<Self> {
        Ok(Self {
            rows: selector("#booksBody tr")?,
            title: selector(".field.title a")?,
            series: selector(".field.title a span")?,
            author: selector(".field.author a")?,
            read_count: selector(".field.read_count .value")?,
            shelves: selector(".field.shelves .shelfLink")?,
            date_started: selector(".field.date_started .date_started_value")?,
            date_read: selector(".field.date_read .date_read_value")?,
            include_shelves: false,
        })
    }

    /// Read the shelves column.
    ///
    /// Signed-out pages render the rating widget in that column, so shelves
    /// are only meaningful for signed-in pages.
    #[must_use]
    pub fn with_shelves(mut self, include: bool) -> Self {
        self.include_shelves = include;
        self
    }

    fn decode_row(&self, row: ElementRef<'_>) -> ReviewRow {
        let id = row.value().attr("id").unwrap_or_default().to_string();
        let review_id = id.split('_').nth(1).unwrap_or_default().to_string();

        let title_with_series = text_of(row, &self.title);
        let series = text_of(row, &self.series);
        let title = remove_last(&title_with_series, &series).trim().to_string();

        let shelves = if self.include_shelves {
            texts_of(row, &self.shelves)
        } else {
            Vec::new()
        };

        ReviewRow {
            id,
            review_id,
            title,
            series,
            author: text_of(row, &self.author),
            read_count: text_of(row, &self.read_count),
            shelves,
            date_started_values: texts_of(row, &self.date_started),
            date_read_values: texts_of(row, &self.date_read),
        }
    }
}

impl PageDecoder for ReviewListDecoder {
    type Output = Vec<ReviewRow>;

    fn decode(&self, body: &str) -> Result<Vec<ReviewRow>> {
        let document = Html::parse_document(body);
        Ok(document
            .select(&self.rows)
            .map(|row| self.decode_row(row))
            .collect())
    }
}

// ============================================================================
// Single review
// ============================================================================

/// Decodes shelves and reading timeline from a `/review/show` page
#[derive(Debug, Clone)]
pub struct ReviewPageDecoder {
    shelves: Selector,
    timeline_rows: Selector,
    timeline_text: Selector,
}

impl ReviewPageDecoder {
    /// Create a new single-review decoder
    pub fn new() -> Result<Self> {
        Ok(Self {
            shelves: selector("span.userReview ~ a.actionLinkLite")?,
            timeline_rows: selector(".readingTimeline .readingTimeline__row")?,
            timeline_text: selector(".readingTimeline__text")?,
        })
    }
}

impl PageDecoder for ReviewPageDecoder {
    type Output = ProgressPage;

    fn decode(&self, body: &str) -> Result<ProgressPage> {
        let document = Html::parse_document(body);

        let shelves = document
            .select(&self.shelves)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect();

        let timeline = document
            .select(&self.timeline_rows)
            .map(|row| {
                let text = text_of(row, &self.timeline_text).replace('\n', " ");
                let mut parts = text.trim().splitn(2, TIMELINE_SEPARATOR);
                TimelineEvent {
                    date: parts.next().unwrap_or_default().trim().to_string(),
                    event: parts.next().unwrap_or_default().trim().to_string(),
                }
            })
            .collect();

        Ok(ProgressPage { shelves, timeline })
    }
}
