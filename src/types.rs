//! Common types used throughout shelfscrape
//!
//! This module contains shared enums and utility traits used across
//! multiple modules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Shelf
// ============================================================================

/// A named Goodreads shelf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Shelf {
    /// Every shelf at once
    #[default]
    #[serde(rename = "#ALL#")]
    All,
    #[serde(rename = "currently-reading")]
    CurrentlyReading,
    #[serde(rename = "on-deck")]
    OnDeck,
    #[serde(rename = "read")]
    Read,
    #[serde(rename = "to-read")]
    ToRead,
}

impl Shelf {
    /// All known shelves, in display order
    pub const ALL: [Shelf; 5] = [
        Shelf::All,
        Shelf::CurrentlyReading,
        Shelf::OnDeck,
        Shelf::Read,
        Shelf::ToRead,
    ];

    /// Query-string value of the shelf
    pub fn as_str(&self) -> &'static str {
        match self {
            Shelf::All => "#ALL#",
            Shelf::CurrentlyReading => "currently-reading",
            Shelf::OnDeck => "on-deck",
            Shelf::Read => "read",
            Shelf::ToRead => "to-read",
        }
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shelf {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Shelf::ALL
            .into_iter()
            .find(|shelf| shelf.as_str() == s)
            .ok_or_else(|| Error::invalid_value("shelf", format!("unknown shelf '{s}'")))
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Transport used to fetch shelf pages
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    /// RSS feed (HTTP + XML)
    #[default]
    Rss,
    /// Review list pages (HTTP + HTML)
    Html,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Rss => f.write_str("rss"),
            Engine::Html => f.write_str("html"),
        }
    }
}

// ============================================================================
// Error Handling Strategy
// ============================================================================

/// What to do with a single malformed item or failed decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnError {
    /// Abort the whole run
    #[default]
    Fail,
    /// Log a warning and keep going without the item
    SkipAndLog,
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    #[default]
    Linear,
    /// Exponential increase in delay
    Exponential,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
