//! Item decoration
//!
//! After the listing is fetched, each item can be enriched with a second,
//! per-item request. Requests run through a bounded pool; results are
//! merged back by review id into new items.

mod decorators;
mod pool;

pub use decorators::{
    decorate_all, ItemDecorator, ReadingProgressFetcher, DEFAULT_PROGRESS_RETRIES,
    DEFAULT_PROGRESS_TIMEOUT,
};
pub use pool::{run_bounded, try_run_bounded};
