//! Retry settings and the backoff schedule derived from them.

use crate::{RateLimitError, RateLimitErrorKind};
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};

/// Settings for the `[retry]` configuration section.
///
/// # Example
///
/// ```toml
/// [retry]
/// max_attempts = 3
/// base_delay_ms = 500
/// max_delay_ms = 30_000
/// max_elapsed_secs = 120
/// jitter = false
/// requests_per_minute = 20
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct RetryConfig {
    /// Total attempts per call, including the first one
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,

    /// Base delay; the wait before retry `n` is `base_delay_ms * 2^n`
    #[serde(default = "default_base_delay_ms")]
    base_delay_ms: u64,

    /// Upper bound for any single wait
    #[serde(default = "default_max_delay_ms")]
    max_delay_ms: u64,

    /// Wall-clock budget for one call including every retry
    #[serde(default = "default_max_elapsed_secs")]
    max_elapsed_secs: u64,

    /// Randomize each wait between zero and its scheduled value
    #[serde(default)]
    jitter: bool,

    /// Optional client-side pacing of outgoing requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[setters(strip_option)]
    requests_per_minute: Option<u32>,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_max_elapsed_secs() -> u64 {
    120
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_elapsed_secs: default_max_elapsed_secs(),
            jitter: false,
            requests_per_minute: None,
        }
    }
}

impl RetryConfig {
    /// Upper bound accepted for `max_attempts`.
    pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

    /// Check that the settings describe a usable schedule.
    ///
    /// # Examples
    ///
    /// ```
    /// use storytime_rate_limit::RetryConfig;
    ///
    /// assert!(RetryConfig::default().validate().is_ok());
    /// assert!(RetryConfig::default().with_max_attempts(0).validate().is_err());
    /// assert!(RetryConfig::default().with_max_attempts(11).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), RateLimitError> {
        if !(1..=Self::MAX_ATTEMPTS_LIMIT).contains(&self.max_attempts) {
            return Err(RateLimitError::new(RateLimitErrorKind::InvalidAttempts(
                self.max_attempts,
            )));
        }
        if self.base_delay_ms == 0 {
            return Err(RateLimitError::new(RateLimitErrorKind::InvalidDelay(
                "base_delay_ms must be greater than zero".to_string(),
            )));
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err(RateLimitError::new(RateLimitErrorKind::InvalidDelay(format!(
                "max_delay_ms ({}) is smaller than base_delay_ms ({})",
                self.max_delay_ms, self.base_delay_ms
            ))));
        }
        if self.max_elapsed_secs == 0 {
            return Err(RateLimitError::new(RateLimitErrorKind::InvalidBudget(
                "max_elapsed_secs must be greater than zero".to_string(),
            )));
        }
        if self.requests_per_minute == Some(0) {
            return Err(RateLimitError::new(RateLimitErrorKind::InvalidBudget(
                "requests_per_minute must be greater than zero when set".to_string(),
            )));
        }
        Ok(())
    }

    /// Wall-clock budget as a duration.
    pub fn max_elapsed(&self) -> Duration {
        Duration::from_secs(self.max_elapsed_secs)
    }

    /// Backoff schedule for these settings.
    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            base: self.base_delay_ms,
            cap: Duration::from_millis(self.max_delay_ms),
            retries: self.max_attempts.saturating_sub(1) as usize,
            jitter: self.jitter,
        }
    }
}

/// Exponential backoff schedule: one wait per retry, `base * 2^n` capped.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storytime_rate_limit::RetryConfig;
///
/// let policy = RetryConfig::default()
///     .with_max_attempts(4)
///     .with_base_delay_ms(500)
///     .with_max_delay_ms(3_000)
///     .backoff_policy();
///
/// assert_eq!(
///     policy.delays(),
///     vec![
///         Duration::from_millis(1_000),
///         Duration::from_millis(2_000),
///         Duration::from_millis(3_000),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    base: u64,
    cap: Duration,
    retries: usize,
    jitter: bool,
}

impl BackoffPolicy {
    /// Iterator of waits handed to the retry loop.
    pub fn strategy(&self) -> Box<dyn Iterator<Item = Duration> + Send> {
        // from_millis(2).factor(base) yields base*2, base*4, base*8, ...
        let schedule = ExponentialBackoff::from_millis(2)
            .factor(self.base)
            .max_delay(self.cap)
            .take(self.retries);
        if self.jitter {
            Box::new(schedule.map(jitter))
        } else {
            Box::new(schedule)
        }
    }

    /// The scheduled waits without jitter, in order.
    pub fn delays(&self) -> Vec<Duration> {
        Self {
            jitter: false,
            ..*self
        }
        .strategy()
        .collect()
    }

    /// Number of retries after the first attempt.
    pub fn retries(&self) -> usize {
        self.retries
    }
}
