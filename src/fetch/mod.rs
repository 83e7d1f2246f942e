//! Page fetchers
//!
//! A `PageFetcher` turns one `PageDescriptor` into one page of raw items.
//! The pagination engine is written once against this trait; each
//! transport (RSS feed, HTML review list) is an implementation.

mod fetchers;

pub use fetchers::{
    HtmlFetcher, PageFetcher, RssFetcher, DEFAULT_FEED_TIMEOUT, DEFAULT_LIST_TIMEOUT,
};
