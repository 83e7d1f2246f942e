//! Item normalization
//!
//! Maps the raw records of each transport onto one canonical item schema.
//! Normalizers are pure: no I/O, no shared state.

mod normalizers;
mod types;

pub use normalizers::{
    review_id_from_guid, round_average_rating, safe_date, safe_int_as_string, ItemNormalizer,
    ReviewRowNormalizer, RssNormalizer,
};
pub use types::{CanonicalItem, ReadingProgress};

pub use crate::decode::TimelineEvent;
