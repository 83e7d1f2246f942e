//! Retry module
//!
//! Runs one fallible async operation up to `max_retries` times.
//!
//! # Overview
//!
//! - `RetryPolicy` - attempt budget and backoff between attempts
//! - `execute_with_retry` - retry on any failure
//! - `execute_with_retry_if` - retry only failures the predicate accepts
//!
//! The last failure is returned verbatim, so callers can tell an exhausted
//! operation apart from a successful (possibly empty) result.

mod executor;

pub use executor::{execute_with_retry, execute_with_retry_if, RetryPolicy};
