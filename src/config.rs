//! Configuration for a scrape run
//!
//! Everything the CLI can set also has a YAML form, so a run can be
//! described in a file and then adjusted with flags.

use crate::engine::FetchOptions;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete scrape configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Pagination, retry and decoration settings
    #[serde(default)]
    pub fetch: FetchOptions,

    /// Transport settings
    #[serde(default)]
    pub http: HttpSettings,
}

impl ScrapeConfig {
    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document means "all defaults"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values no run could use
    pub fn validate(&self) -> Result<()> {
        self.fetch.validate()?;
        self.http.validate()
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// Transport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Goodreads origin; overridable for testing
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User agent; the client default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Per-page timeout; the transport default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_timeout_ms: Option<u64>,

    /// Per-request timeout for reading-progress pages
    #[serde(default = "default_progress_timeout_ms")]
    pub progress_timeout_ms: u64,

    /// Request throttle shared by every request of a run (0 disables it)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: None,
            page_timeout_ms: None,
            progress_timeout_ms: default_progress_timeout_ms(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_progress_timeout_ms() -> u64 {
    2000
}

fn default_requests_per_second() -> u32 {
    5
}

impl HttpSettings {
    /// Per-page timeout, if configured
    pub fn page_timeout(&self) -> Option<Duration> {
        self.page_timeout_ms.map(Duration::from_millis)
    }

    /// Reading-progress timeout
    pub fn progress_timeout(&self) -> Duration {
        Duration::from_millis(self.progress_timeout_ms)
    }

    /// Client configuration for these settings
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder();
        builder = if self.requests_per_second == 0 {
            builder.no_rate_limit()
        } else {
            builder.rate_limit(RateLimiterConfig::per_second(self.requests_per_second))
        };
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }

    /// Reject unusable transport settings
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("http.base_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "http.base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if self.page_timeout_ms == Some(0) {
            return Err(Error::invalid_value(
                "http.page_timeout_ms",
                "must be greater than 0",
            ));
        }
        if self.progress_timeout_ms == 0 {
            return Err(Error::invalid_value(
                "http.progress_timeout_ms",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OnError;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ScrapeConfig::default();
        assert_eq!(config.fetch.max_retries(), 5);
        assert_eq!(config.fetch.max_pages, -1);
        assert_eq!(config.http.base_url, "https://www.goodreads.com");
        assert_eq!(config.http.progress_timeout(), Duration::from_millis(2000));
        assert!(config.http.page_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ScrapeConfig::from_yaml_str("  \n").unwrap(), ScrapeConfig::default());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r"
fetch:
  max_pages: 3
  concurrency: 8
  on_error: skip_and_log
  retry:
    max_retries: 2
    backoff: exponential
    initial_backoff: 250
http:
  base_url: http://localhost:8080
  page_timeout_ms: 1500
  requests_per_second: 0
";
        let config = ScrapeConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.fetch.max_pages, 3);
        assert_eq!(config.fetch.concurrency, 8);
        assert_eq!(config.fetch.page_size, 100);
        assert_eq!(config.fetch.on_error, OnError::SkipAndLog);
        assert_eq!(config.fetch.max_retries(), 2);
        assert_eq!(config.fetch.retry.initial_backoff, Duration::from_millis(250));
        assert_eq!(config.http.base_url, "http://localhost:8080");
        assert_eq!(config.http.page_timeout(), Some(Duration::from_millis(1500)));
        assert!(config.http.client_config().rate_limit.is_none());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = ScrapeConfig {
            fetch: FetchOptions::default().with_max_pages(7),
            http: HttpSettings {
                user_agent: Some("agent/1".to_string()),
                ..Default::default()
            },
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ScrapeConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            ScrapeConfig::from_yaml_str("fetch:\n  page_size: 0\n"),
            Err(Error::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            ScrapeConfig::from_yaml_str("http:\n  base_url: ftp://example.com\n"),
            Err(Error::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            ScrapeConfig::from_yaml_str("http:\n  base_url: not a url\n"),
            Err(Error::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            ScrapeConfig::from_yaml_str("fetch: [1, 2]\n"),
            Err(Error::YamlParse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fetch:\n  max_pages: 1").unwrap();

        let config = ScrapeConfig::load(file.path()).unwrap();
        assert_eq!(config.fetch.max_pages, 1);

        assert!(matches!(
            ScrapeConfig::load("/definitely/not/here.yaml"),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_client_config() {
        let settings = HttpSettings {
            user_agent: Some("agent/1".to_string()),
            requests_per_second: 2,
            ..Default::default()
        };
        let client = settings.client_config();
        assert_eq!(client.user_agent, "agent/1");
        assert_eq!(client.rate_limit, Some(RateLimiterConfig::new(2, 2)));
    }
}
