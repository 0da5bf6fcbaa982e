//! Error types for the Storytime workspace.
//!
//! This crate provides the foundation error types used throughout Storytime.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use storytime_error::{StorytimeResult, JsonError};
//!
//! fn fetch_story() -> StorytimeResult<String> {
//!     Err(JsonError::new("expected a story object"))?
//! }
//!
//! match fetch_story() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod console;
mod error;
mod json;
mod model;
mod story;

pub use config::ConfigError;
pub use console::{ConsoleError, ConsoleErrorKind};
pub use error::{StorytimeError, StorytimeErrorKind, StorytimeResult};
pub use json::JsonError;
pub use model::{ModelError, ModelErrorKind, RetryableError};
pub use story::{StoryError, StoryErrorKind};
