//! CLI module
//!
//! Command-line interface for scraping shelves.
//!
//! # Commands
//!
//! - `fetch` - Fetch a shelf, write the feed and its reading progress
//! - `config` - Print the effective configuration
//! - `shelves` - List shelf names

mod commands;
mod runner;

pub use commands::{Cli, Commands, FetchArgs};
pub use runner::{fetch_html, fetch_rss, Runner};

#[cfg(test)]
mod tests;
