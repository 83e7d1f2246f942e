//! Markup decoder module
//!
//! Supports: the RSS shelf feed (XML), the review-list page (HTML) and the
//! single-review page (HTML).
//!
//! # Overview
//!
//! Each decoder turns a response body into the raw records a fetcher
//! hands to the pagination engine. Decoders are synchronous and never
//! touch the network.

mod html;
mod rss;
mod types;

pub use html::{remove_last, ReviewListDecoder, ReviewPageDecoder};
pub use rss::RssDecoder;
pub use types::{PageDecoder, ProgressPage, ReviewRow, RssChannel, RssRecord, TimelineEvent};
