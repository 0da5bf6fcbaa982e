//! Storytime - interactive children's stories in the terminal.
//!
//! Storytime asks for a topic, has a language model write the opening, and
//! then lets the reader steer the story from a nine-option menu. Every
//! generated segment is checked for age-appropriateness before it becomes
//! part of the story, and failed or unsafe generations degrade to gentle
//! canned content instead of errors.
//!
//! # Architecture
//!
//! Storytime is organized as a workspace with focused crates:
//!
//! - `storytime_error` - Error types
//! - `storytime_core` - Provider-neutral request and response types
//! - `storytime_interface` - The `StoryDriver` trait
//! - `storytime_rate_limit` - Retry executor, backoff and request pacing
//! - `storytime_security` - Safety validator contract and content filter
//! - `storytime_models` - OpenAI-compatible model driver
//! - `storytime_narrative` - Story state, prompts and the session controller
//!
//! This crate loads configuration, initializes logging and runs the console
//! loop. It re-exports the types needed to assemble a session.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod console;
mod observability;

pub use config::StorytimeConfig;
pub use console::Console;
pub use observability::{LoggingConfig, init_logging};

pub use storytime_error::{ConfigError, StorytimeError, StorytimeErrorKind, StorytimeResult};
pub use storytime_models::{ModelConfig, OpenAIDriver};
pub use storytime_narrative::{
    JudgeValidator, MenuChoice, SessionConfig, SessionController, StoryAction, StoryState,
    StoryStatus, TurnReport,
};
pub use storytime_rate_limit::{RetryConfig, RetryExecutor};
pub use storytime_security::{ContentFilter, SafetyConfig, SafetyValidator};
