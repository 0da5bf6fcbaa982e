//! Safety error types.

/// Specific safety error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SafetyErrorKind {
    /// A prohibited pattern is not a valid regular expression
    #[display("Invalid regex pattern '{}': {}", pattern, reason)]
    InvalidPattern {
        /// Pattern as written in the configuration
        pattern: String,
        /// Why the regex engine rejected it
        reason: String,
    },

    /// Configuration error
    #[display("Configuration error: {}", _0)]
    Configuration(String),
}

/// Safety error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Safety Error: {} at line {} in {}", kind, line, file)]
pub struct SafetyError {
    /// The specific error kind
    pub kind: SafetyErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl SafetyError {
    /// Create a new safety error with location tracking.
    #[track_caller]
    pub fn new(kind: SafetyErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SafetyErrorKind {
        &self.kind
    }
}

impl From<SafetyError> for storytime_error::ConfigError {
    #[track_caller]
    fn from(err: SafetyError) -> Self {
        storytime_error::ConfigError::new(format!("[safety] {}", err.kind))
    }
}

/// Result type for safety operations.
pub type SafetyResult<T> = Result<T, SafetyError>;
