//! JSON feed writer
//!
//! Provides utilities for writing the feed document to disk.

use super::feed::Feed;
use crate::error::{Result, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for the JSON writer
#[derive(Debug, Clone)]
pub struct JsonWriterConfig {
    pretty: bool,
    create_dirs: bool,
}

impl Default for JsonWriterConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            create_dirs: true,
        }
    }
}

impl JsonWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-print with two-space indentation
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Create missing parent directories
    #[must_use]
    pub fn with_create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }
}

/// Write the feed to `path`, replacing any existing file
pub fn write_feed_json(path: impl AsRef<Path>, feed: &Feed, config: &JsonWriterConfig) -> Result<()> {
    let path = path.as_ref();

    if config.create_dirs {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
    }

    let json = if config.pretty {
        serde_json::to_string_pretty(feed)?
    } else {
        serde_json::to_string(feed)?
    };

    fs::write(path, json).with_context(|| format!("Failed to write '{}'", path.display()))?;

    info!("Wrote {} ({} items)", path.display(), feed.len());
    Ok(())
}

/// Read a feed previously written with [`write_feed_json`]
pub fn read_feed_json(path: impl AsRef<Path>) -> Result<Feed> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

/// Companion path for the decorated feed: `feed.json` becomes
/// `feed-progress.json`. Paths without a `.json` suffix get
/// `-progress.json` appended.
pub fn progress_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = name.strip_suffix(".json").unwrap_or(&name);
    path.with_file_name(format!("{stem}-progress.json"))
}
