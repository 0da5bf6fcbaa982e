//! Top-level error wrapper types.

use crate::{ConfigError, ConsoleError, JsonError, ModelError, StoryError};

/// Every error condition a Storytime crate can surface.
///
/// # Examples
///
/// ```
/// use storytime_error::{StorytimeError, JsonError};
///
/// let json_err = JsonError::new("expected object");
/// let err: StorytimeError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StorytimeErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Model provider error
    #[from(ModelError)]
    Model(ModelError),
    /// Story state error
    #[from(StoryError)]
    Story(StoryError),
    /// Console input/output error
    #[from(ConsoleError)]
    Console(ConsoleError),
}

/// Storytime error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storytime_error::{StorytimeResult, ConfigError};
///
/// fn might_fail() -> StorytimeResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storytime Error: {}", _0)]
pub struct StorytimeError(Box<StorytimeErrorKind>);

impl StorytimeError {
    /// Create a new error from a kind.
    pub fn new(kind: StorytimeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorytimeErrorKind {
        &self.0
    }

    /// The model error inside this error, if that is what it wraps.
    pub fn as_model_error(&self) -> Option<&ModelError> {
        match self.kind() {
            StorytimeErrorKind::Model(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to StorytimeErrorKind
impl<T> From<T> for StorytimeError
where
    T: Into<StorytimeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storytime operations.
pub type StorytimeResult<T> = std::result::Result<T, StorytimeError>;
