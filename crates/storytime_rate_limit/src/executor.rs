//! Bounded retry of model calls with an explicit outcome.

use crate::{RequestPacer, RetryConfig};
use derive_getters::Getters;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use storytime_core::GenerateRequest;
use storytime_error::{ModelError, ModelErrorKind, RetryableError, StorytimeError};
use storytime_interface::StoryDriver;
use tokio_retry2::{Retry, RetryError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Text produced by a successful call.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Generation {
    /// Trimmed model text, never empty
    text: String,
    /// Attempts spent, including the successful one
    attempts: u32,
    /// The model stopped at its output token limit, so the text is incomplete
    truncated: bool,
}

impl Generation {
    /// Consume the generation and keep only its text.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Why the executor gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ExhaustionReason {
    /// Every attempt failed with a retryable error
    #[display("retries exhausted")]
    RetriesExhausted,
    /// The provider reported an error that retrying cannot fix
    #[display("fatal provider error")]
    Fatal,
    /// The wall-clock budget ran out
    #[display("timed out")]
    TimedOut,
    /// The caller cancelled the call
    #[display("cancelled")]
    Cancelled,
}

/// Details of a call that produced no usable text.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ExhaustedFailure {
    /// Why the executor stopped
    reason: ExhaustionReason,
    /// Attempts started before stopping
    attempts: u32,
    /// Message of the most recent provider error, if one occurred
    last_error: Option<String>,
}

impl std::fmt::Display for ExhaustedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} after {} attempt(s)", self.reason, self.attempts)?;
        if let Some(err) = &self.last_error {
            write!(f, ": {}", err)?;
        }
        Ok(())
    }
}

/// Result of [`RetryExecutor::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The model produced text
    Success(Generation),
    /// No text could be obtained; the caller should degrade to fallback content
    Exhausted(ExhaustedFailure),
}

impl ExecutionOutcome {
    /// The generated text, if the call succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            ExecutionOutcome::Success(generation) => Some(generation.text()),
            ExecutionOutcome::Exhausted(_) => None,
        }
    }

    /// Attempts spent on the call.
    pub fn attempts(&self) -> u32 {
        match self {
            ExecutionOutcome::Success(generation) => *generation.attempts(),
            ExecutionOutcome::Exhausted(failure) => *failure.attempts(),
        }
    }
}

/// Runs model calls with bounded retries, a time budget and cancellation.
///
/// Only one call is in flight at a time: attempts are sequential and the
/// executor is driven by a single session.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use storytime_core::{GenerateRequest, Message};
/// use storytime_interface::StoryDriver;
/// use storytime_rate_limit::{ExecutionOutcome, RetryConfig, RetryExecutor};
///
/// # async fn demo(driver: Arc<dyn StoryDriver>) {
/// let executor = RetryExecutor::new(driver, RetryConfig::default());
/// let request = GenerateRequest::new(vec![Message::user("Tell a story")]);
/// match executor.execute(&request).await {
///     ExecutionOutcome::Success(generation) => println!("{}", generation.text()),
///     ExecutionOutcome::Exhausted(failure) => eprintln!("gave up: {}", failure),
/// }
/// # }
/// ```
pub struct RetryExecutor {
    driver: Arc<dyn StoryDriver>,
    config: RetryConfig,
    pacer: Option<RequestPacer>,
    cancel: CancellationToken,
}

impl RetryExecutor {
    /// Create an executor around a driver.
    pub fn new(driver: Arc<dyn StoryDriver>, config: RetryConfig) -> Self {
        let pacer = config
            .requests_per_minute()
            .and_then(RequestPacer::per_minute);
        Self {
            driver,
            config,
            pacer,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that aborts the in-flight call when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Active retry settings.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// The driver behind this executor.
    pub fn driver(&self) -> &Arc<dyn StoryDriver> {
        &self.driver
    }

    /// Run one request to completion or exhaustion.
    #[instrument(
        skip(self, request),
        fields(
            provider = self.driver.provider_name(),
            model = self.driver.model_name(),
            max_attempts = self.config.max_attempts()
        )
    )]
    pub async fn execute(&self, request: &GenerateRequest) -> ExecutionOutcome {
        let progress = Progress::default();

        if self.cancel.is_cancelled() {
            return progress.exhausted(ExhaustionReason::Cancelled);
        }

        let strategy = self.config.backoff_policy().strategy();
        let retried = Retry::spawn(strategy, || self.attempt(request, &progress));

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                warn!("Model call cancelled");
                return progress.exhausted(ExhaustionReason::Cancelled);
            }
            result = tokio::time::timeout(self.config.max_elapsed(), retried) => result,
        };

        match result {
            Ok(Ok((text, truncated))) => {
                let attempts = progress.attempts.load(Ordering::SeqCst);
                if truncated {
                    warn!(attempts, chars = text.len(), "Model output hit the token limit");
                } else {
                    debug!(attempts, chars = text.len(), "Model call succeeded");
                }
                ExecutionOutcome::Success(Generation {
                    text,
                    attempts,
                    truncated,
                })
            }
            Ok(Err(err)) => {
                let reason = if is_retryable(&err) {
                    ExhaustionReason::RetriesExhausted
                } else {
                    ExhaustionReason::Fatal
                };
                warn!(error = %err, %reason, "Model call failed");
                progress.exhausted(reason)
            }
            Err(_) => {
                warn!(
                    budget_secs = self.config.max_elapsed_secs(),
                    "Model call exceeded its time budget"
                );
                progress.exhausted(ExhaustionReason::TimedOut)
            }
        }
    }

    async fn attempt(
        &self,
        request: &GenerateRequest,
        progress: &Progress,
    ) -> Result<(String, bool), RetryError<StorytimeError>> {
        let attempt = progress.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(pacer) = &self.pacer {
            pacer.until_ready().await;
        }
        debug!(attempt, "Calling model");

        let err = match self.driver.generate(request).await {
            Ok(response) => {
                let text = response.joined_text();
                if !text.is_empty() {
                    return Ok((text, response.truncated));
                }
                StorytimeError::from(ModelError::new(ModelErrorKind::EmptyResponse))
            }
            Err(err) => err,
        };
        progress.record(&err);

        if is_retryable(&err) {
            warn!(attempt, error = %err, "Model call failed, will retry");
            Err(RetryError::Transient {
                err,
                retry_after: None,
            })
        } else {
            warn!(attempt, error = %err, "Permanent model error, failing immediately");
            Err(RetryError::Permanent(err))
        }
    }
}

/// Bookkeeping shared between the attempts of one call.
#[derive(Default)]
struct Progress {
    attempts: AtomicU32,
    last_error: Mutex<Option<String>>,
}

impl Progress {
    fn record(&self, err: &StorytimeError) {
        if let Ok(mut last) = self.last_error.lock() {
            *last = Some(err.to_string());
        }
    }

    fn exhausted(&self, reason: ExhaustionReason) -> ExecutionOutcome {
        let last_error = self.last_error.lock().ok().and_then(|last| last.clone());
        ExecutionOutcome::Exhausted(ExhaustedFailure {
            reason,
            attempts: self.attempts.load(Ordering::SeqCst),
            last_error,
        })
    }
}

/// Errors that are not model errors (HTTP plumbing, JSON) count as fatal.
fn is_retryable(err: &StorytimeError) -> bool {
    err.as_model_error().is_some_and(RetryableError::is_retryable)
}
