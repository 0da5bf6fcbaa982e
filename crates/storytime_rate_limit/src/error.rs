//! Error types for retry configuration.

use std::fmt;

/// Error kinds for retry and pacing configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RateLimitErrorKind {
    /// Attempt count outside the supported range.
    InvalidAttempts(u32),
    /// Delay settings that cannot produce a sensible schedule.
    InvalidDelay(String),
    /// Zero or otherwise unusable elapsed-time budget.
    InvalidBudget(String),
}

impl fmt::Display for RateLimitErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitErrorKind::InvalidAttempts(n) => {
                write!(f, "max_attempts must be between 1 and 10, got {}", n)
            }
            RateLimitErrorKind::InvalidDelay(msg) => write!(f, "Invalid delay: {}", msg),
            RateLimitErrorKind::InvalidBudget(msg) => write!(f, "Invalid time budget: {}", msg),
        }
    }
}

/// Retry configuration error with location tracking.
#[derive(Debug, Clone)]
pub struct RateLimitError {
    kind: RateLimitErrorKind,
    line: u32,
    file: &'static str,
}

impl RateLimitError {
    /// Create a new error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RateLimitErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RateLimitErrorKind {
        &self.kind
    }
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rate Limit Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for RateLimitError {}

impl<T> From<T> for RateLimitError
where
    T: Into<RateLimitErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl From<RateLimitError> for storytime_error::ConfigError {
    #[track_caller]
    fn from(err: RateLimitError) -> Self {
        storytime_error::ConfigError::new(format!("[retry] {}", err.kind))
    }
}
