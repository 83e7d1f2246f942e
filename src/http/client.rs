//! HTTP client with timeouts and rate limiting
//!
//! Provides a thin HTTP client that handles:
//! - Per-request timeouts, reported as `Error::Timeout`
//! - Rate limiting to stay polite with Goodreads
//! - Session cookies for signed-in listings
//! - Status classification so the retry executor can decide what to retry

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::AuthState;
use crate::error::{Error, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Error bodies are cut to this many characters
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Default request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: HashMap::new(),
            user_agent: format!("shelfscrape/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the default request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client used by fetchers and decorators
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    auth: AuthState,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            auth: AuthState::anonymous(),
            rate_limiter,
        })
    }

    /// Attach session credentials to every request
    #[must_use]
    pub fn with_auth(mut self, auth: AuthState) -> Self {
        self.auth = auth;
        self
    }

    /// Session credentials in use
    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// Default request timeout
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// GET a URL and return the body as text.
    ///
    /// Any non-2xx status becomes `Error::HttpStatus`; running past
    /// `timeout` (or the client default) becomes `Error::Timeout`.
    pub async fn get_text(&self, url: &Url, timeout: Option<Duration>) -> Result<String> {
        let timeout = timeout.unwrap_or(self.config.timeout);

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self.client.get(url.clone()).timeout(timeout);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        req = self.auth.apply(req);

        // The query string may carry the feed key, so only the path is logged
        debug!("GET {}", url.path());

        let response = req.send().await.map_err(|e| classify(e, timeout))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("GET {} failed with {}", url.path(), status.as_u16());
            return Err(Error::http_status(
                status.as_u16(),
                body.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>(),
            ));
        }

        response.text().await.map_err(|e| classify(e, timeout))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("auth", &self.auth)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Map a transport failure, keeping timeouts distinguishable.
///
/// The URL is stripped because feed URLs carry the feed key.
fn classify(error: reqwest::Error, timeout: Duration) -> Error {
    if error.is_timeout() {
        Error::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        Error::Http(error.without_url())
    }
}
