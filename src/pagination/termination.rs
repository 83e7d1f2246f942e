//! Termination policy
//!
//! Decides after each fetched page whether pagination is finished.

use super::types::PageDescriptor;
use std::fmt;

/// Outcome of evaluating a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The page had no items
    Empty,
    /// The page had fewer items than requested, so it is the last one
    ShortPage,
    /// The configured page cap was reached
    MaxPages,
    /// Keep going
    Continue,
}

impl TerminationReason {
    /// Check if pagination should stop
    pub fn should_terminate(&self) -> bool {
        !matches!(self, Self::Continue)
    }

    /// Check if pagination should continue
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Short code used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::ShortPage => "short-page",
            Self::MaxPages => "max-pages",
            Self::Continue => "continue",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate a fetched page.
///
/// Checks run in priority order: empty page, short page, page cap.
/// A negative `max_pages` means no cap.
pub fn check_termination(
    item_count: usize,
    descriptor: &PageDescriptor,
    max_pages: i64,
) -> TerminationReason {
    if item_count == 0 {
        return TerminationReason::Empty;
    }

    if item_count < descriptor.page_size_hint as usize {
        return TerminationReason::ShortPage;
    }

    if max_pages >= 0 && i64::from(descriptor.page_index) >= max_pages {
        return TerminationReason::MaxPages;
    }

    TerminationReason::Continue
}
