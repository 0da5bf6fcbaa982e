//! Story state error types.

/// Specific error conditions for story state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoryErrorKind {
    /// The requested action is not valid from the current status
    #[display("Action '{}' is not allowed while the story is {}", action, status)]
    InvalidTransition {
        /// Action that was attempted
        action: String,
        /// Status the story was in
        status: String,
    },
    /// A segment or replacement narrative contained no text
    #[display("Story segments cannot be empty")]
    EmptySegment,
    /// A mutation was attempted before any story was started
    #[display("No story has been started yet")]
    NotStarted,
    /// A mutation was attempted after the story ended
    #[display("The story has already ended")]
    Ended,
    /// A required free-text value was blank
    #[display("Missing value for {}", _0)]
    MissingValue(String),
}

/// Error type for story state operations.
///
/// # Examples
///
/// ```
/// use storytime_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::NotStarted);
/// assert!(format!("{}", err).contains("started"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
