// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # shelfscrape
//!
//! Scrapes a user's Goodreads shelves into a JSON feed.
//!
//! ## Features
//!
//! - **Two transports**: the `list_rss` feed (XML) or the review list (HTML)
//! - **Paginated fetch**: per-page retry with backoff and a termination policy
//! - **Normalization**: both transports produce the same `CanonicalItem`
//! - **Reading progress**: bounded-concurrency decoration from review pages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shelfscrape::engine::PaginationEngine;
//! use shelfscrape::fetch::RssFetcher;
//! use shelfscrape::http::HttpClient;
//! use shelfscrape::normalize::RssNormalizer;
//! use shelfscrape::pagination::FeedSource;
//! use shelfscrape::{Result, Shelf};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Arc::new(HttpClient::new()?);
//!     let source = FeedSource::new("1234", "feed-key", Shelf::Read)?;
//!     let engine = PaginationEngine::new(RssFetcher::new(client), RssNormalizer::new());
//!
//!     for item in engine.fetch_all(&source).await? {
//!         println!("{} by {}", item.title, item.author_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       PaginationEngine                          │
//! │  PageSource → PageFetcher (retry) → ItemNormalizer → terminate  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │    Decode     │ Normalize │  Decorate   │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Cookie   │ Timeouts  │ RSS (XML)     │ Dates     │ Progress    │
//! │ Sign-in  │ Rate Limit│ Review list   │ Ratings   │ Bounded pool│
//! │ check    │ Status    │ Review page   │ Ids       │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Session cookie handling
pub mod auth;

/// HTTP client with timeouts and rate limiting
pub mod http;

/// Per-operation retry with backoff
pub mod retry;

/// Page sources and termination policy
pub mod pagination;

/// Response decoders (RSS, HTML)
pub mod decode;

/// Mapping raw records to canonical items
pub mod normalize;

/// Page fetchers per transport
pub mod fetch;

/// Main pagination engine
pub mod engine;

/// Reading-progress decoration
pub mod decorate;

/// Feed output
pub mod output;

/// Run configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ScrapeConfig;
pub use engine::{FetchOptions, FetchSession, PaginationEngine};
pub use normalize::CanonicalItem;
pub use output::Feed;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
