//! Model provider errors and retry classification.

/// Error conditions reported by the external language model.
///
/// Every provider failure is classified into one of these kinds so the retry
/// executor can decide whether another attempt is worthwhile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ModelErrorKind {
    /// Provider rejected the call because of request quotas (HTTP 429)
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// Recoverable failure such as a timeout, network blip or 5xx response
    #[display("Transient failure: {}", _0)]
    Transient(String),
    /// Permanent failure such as a bad credential or malformed request
    #[display("Fatal failure: {}", _0)]
    Fatal(String),
    /// Provider answered without any text
    #[display("Model returned an empty response")]
    EmptyResponse,
}

impl ModelErrorKind {
    /// Classify an HTTP status code returned by a provider.
    ///
    /// # Examples
    ///
    /// ```
    /// use storytime_error::ModelErrorKind;
    ///
    /// assert!(matches!(ModelErrorKind::from_status(429, "slow down"), ModelErrorKind::RateLimited(_)));
    /// assert!(matches!(ModelErrorKind::from_status(503, "busy"), ModelErrorKind::Transient(_)));
    /// assert!(matches!(ModelErrorKind::from_status(401, "bad key"), ModelErrorKind::Fatal(_)));
    ///
    /// // An exhausted quota is a 429 that waiting will not fix.
    /// let body = r#"{"error": {"code": "insufficient_quota"}}"#;
    /// assert!(matches!(ModelErrorKind::from_status(429, body), ModelErrorKind::Fatal(_)));
    /// ```
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = format!("HTTP {}: {}", status_code, message.into());
        match status_code {
            429 if message.contains("insufficient_quota") => ModelErrorKind::Fatal(message),
            429 => ModelErrorKind::RateLimited(message),
            408 | 500 | 502 | 503 | 504 => ModelErrorKind::Transient(message),
            _ => ModelErrorKind::Fatal(message),
        }
    }

    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ModelErrorKind::RateLimited(_)
                | ModelErrorKind::Transient(_)
                | ModelErrorKind::EmptyResponse
        )
    }

    /// Check if the provider asked us to slow down.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ModelErrorKind::RateLimited(_))
    }
}

/// Model error with source location tracking.
///
/// # Examples
///
/// ```
/// use storytime_error::{ModelError, ModelErrorKind, RetryableError};
///
/// let err = ModelError::new(ModelErrorKind::Transient("connection reset".into()));
/// assert!(err.is_retryable());
/// assert!(format!("{}", err).contains("connection reset"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Model Error: {} at line {} in {}", kind, line, file)]
pub struct ModelError {
    /// The kind of error that occurred
    pub kind: ModelErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ModelError {
    /// Create a new ModelError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ModelErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// Transient errors like 503 (service unavailable), 429 (rate limit) or
/// network timeouts return true. Permanent errors like 401 (unauthorized) or
/// 400 (bad request) return false.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Returns true if the error came from provider-side throttling.
    fn is_rate_limit(&self) -> bool {
        false
    }
}

impl RetryableError for ModelError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn is_rate_limit(&self) -> bool {
        self.kind.is_rate_limit()
    }
}
