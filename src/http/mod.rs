//! HTTP client module
//!
//! Provides the HTTP client shared by every page fetcher and decorator.
//!
//! # Features
//!
//! - **Per-request timeouts**: surfaced as `Error::Timeout` so callers can retry
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Sessions**: optional cookie from `AuthState`
//!
//! Retrying is deliberately left to `crate::retry`.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
