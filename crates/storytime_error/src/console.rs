//! Console input and output error types.

/// Console error kind variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ConsoleErrorKind {
    /// Failed to read a line of user input
    #[display("Failed to read input: {}", _0)]
    Read(String),
    /// Failed to write to the terminal
    #[display("Failed to write output: {}", _0)]
    Write(String),
}

/// Console error with source location tracking.
///
/// # Examples
///
/// ```
/// use storytime_error::{ConsoleError, ConsoleErrorKind};
///
/// let err = ConsoleError::new(ConsoleErrorKind::Read("stdin closed".to_string()));
/// assert!(format!("{}", err).contains("read input"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Console Error: {} at line {} in {}", kind, line, file)]
pub struct ConsoleError {
    /// Error kind
    pub kind: ConsoleErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl ConsoleError {
    /// Create a new ConsoleError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConsoleErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
