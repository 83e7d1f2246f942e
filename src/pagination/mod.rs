//! Pagination module
//!
//! Supports: Goodreads review-list pages and the review RSS feed
//!
//! # Overview
//!
//! A `PageSource` turns a resource (user + shelf) into an endless, restartable
//! sequence of `PageDescriptor`s. It knows nothing about when to stop; that
//! decision belongs to `check_termination`, evaluated after each fetched page.

mod source;
mod termination;
mod types;

pub(crate) use source::endpoint;
pub use source::{FeedSource, PageSource, Pages, ShelfListSource, DEFAULT_BASE_URL};
pub use termination::{check_termination, TerminationReason};
pub use types::{PageDescriptor, PageResult, Resource};
