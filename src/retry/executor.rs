//! Retry executor and backoff policy

use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How many times to attempt an operation and how long to wait in between
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_retries: u32,
    /// Type of backoff strategy
    pub backoff: BackoffType,
    /// Delay before the first retry
    #[serde(with = "millis")]
    pub initial_backoff: Duration,
    /// Upper bound for any single delay
    #[serde(with = "millis")]
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff: BackoffType::Linear,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Policy with the given attempt budget and default backoff
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Policy that retries immediately, without sleeping
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Set backoff configuration
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffType, initial: Duration, max: Duration) -> Self {
        self.backoff = backoff;
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Attempt budget, never below one
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        let delay = match self.backoff {
            BackoffType::Constant => self.initial_backoff,
            BackoffType::Linear => self.initial_backoff.saturating_mul(attempt),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt - 1);
                self.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.max_backoff)
    }
}

/// Run `operation` until it succeeds or the policy's attempts are used up.
///
/// Every failure is retried. The error of the final attempt is returned as-is.
pub async fn execute_with_retry<T, E, F, Fut>(
    name: &str,
    policy: &RetryPolicy,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    execute_with_retry_if(name, policy, operation, |_| true).await
}

/// Like [`execute_with_retry`], but gives up as soon as `should_retry`
/// rejects a failure.
pub async fn execute_with_retry_if<T, E, F, Fut, P>(
    name: &str,
    policy: &RetryPolicy,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("{name}: succeeded on attempt {attempt}/{max_attempts}");
                }
                return Ok(value);
            }
            Err(e) => {
                warn!("{name}: attempt {attempt} of {max_attempts} failed: {e}");

                if attempt >= max_attempts {
                    return Err(e);
                }
                if !should_retry(&e) {
                    debug!("{name}: error is not retryable, giving up");
                    return Err(e);
                }

                let delay = policy.delay_after(attempt);
                if !delay.is_zero() {
                    debug!("{name}: retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}

/// Serialize durations as integer milliseconds
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
