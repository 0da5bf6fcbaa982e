//! Retry, backoff and request pacing for model calls.
//!
//! Every call the story session makes to a language model goes through a
//! [`RetryExecutor`]. The executor retries rate limits and transient faults
//! with exponential backoff, gives up immediately on fatal errors, bounds the
//! whole call by a wall-clock budget and can be cancelled from outside.
//! Callers always get an [`ExecutionOutcome`] back, never an error, so the
//! fallback path is visible at every call site.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod executor;
mod limiter;
mod retry;

pub use error::{RateLimitError, RateLimitErrorKind};
pub use executor::{ExecutionOutcome, ExhaustedFailure, ExhaustionReason, Generation, RetryExecutor};
pub use limiter::RequestPacer;
pub use retry::{BackoffPolicy, RetryConfig};
