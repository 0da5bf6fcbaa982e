//! Client-side request pacing using governor.
//!
//! Pacing is optional. When `requests_per_minute` is configured, every
//! attempt the executor makes first waits for a GCRA cell, so retries
//! never burst past the provider's quota.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Requests-per-minute gate shared by clones.
#[derive(Clone)]
pub struct RequestPacer {
    limiter: Arc<DirectRateLimiter>,
    requests_per_minute: NonZeroU32,
}

impl RequestPacer {
    /// Create a pacer, or `None` when `requests_per_minute` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use storytime_rate_limit::RequestPacer;
    ///
    /// assert!(RequestPacer::per_minute(0).is_none());
    /// let pacer = RequestPacer::per_minute(30).unwrap();
    /// assert_eq!(pacer.requests_per_minute(), 30);
    /// ```
    pub fn per_minute(requests_per_minute: u32) -> Option<Self> {
        NonZeroU32::new(requests_per_minute).map(|n| Self {
            limiter: Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))),
            requests_per_minute: n,
        })
    }

    /// Configured rate.
    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute.get()
    }

    /// Wait until another request is allowed.
    pub async fn until_ready(&self) {
        if self.limiter.check().is_err() {
            debug!(
                rpm = self.requests_per_minute.get(),
                "Pacing outgoing model request"
            );
            self.limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for RequestPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPacer")
            .field("requests_per_minute", &self.requests_per_minute)
            .finish()
    }
}
