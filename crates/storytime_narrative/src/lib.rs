//! The interactive story session.
//!
//! A [`SessionController`] owns one [`StoryState`] and turns each
//! [`StoryAction`] into a model call: the [`PromptComposer`] builds the
//! prompt, the retry executor obtains text, a safety validator checks it and
//! only then is the text committed. When the model is unavailable or keeps
//! producing unsuitable text, canned [`fallback`] content keeps the story
//! moving.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storytime_models::{ModelConfig, OpenAIDriver};
//! use storytime_narrative::{SessionConfig, SessionController, StoryAction};
//! use storytime_rate_limit::{RetryConfig, RetryExecutor};
//! use storytime_security::{ContentFilter, ContentFilterConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = Arc::new(OpenAIDriver::from_env(&ModelConfig::default())?);
//! let executor = Arc::new(RetryExecutor::new(driver, RetryConfig::default()));
//! let filter = ContentFilter::new(ContentFilterConfig::default())?;
//! let mut session = SessionController::new(executor, Box::new(filter), SessionConfig::default());
//!
//! let report = session
//!     .apply(StoryAction::Begin("a brave little mouse".into()))
//!     .await?;
//! println!("{}", report.committed().as_deref().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod config;
mod extraction;
pub mod fallback;
mod judge;
mod metadata;
mod prompt;
mod session;
mod state;

pub use action::{MenuChoice, StoryAction};
pub use config::SessionConfig;
pub use extraction::{extract_json, parse_json};
pub use judge::{JudgeReport, JudgeValidator};
pub use metadata::StoryMetadata;
pub use prompt::{Prompt, PromptComposer};
pub use session::{FallbackReason, SessionController, TurnReport};
pub use state::{StoryState, StoryStatus, normalize_character_name};
