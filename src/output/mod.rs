//! Output module
//!
//! Handles the persisted feed document.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Building the `{ title, items }` feed from a fetch run
//! - Writing and reading the feed as pretty-printed JSON
//! - Deriving the `-progress.json` companion path

mod feed;
mod writer;

pub use feed::Feed;
pub use writer::{progress_path, read_feed_json, write_feed_json, JsonWriterConfig};
