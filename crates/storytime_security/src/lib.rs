//! Safety checks for story content.
//!
//! Every piece of model text must pass a [`SafetyValidator`] before it can
//! become part of a story. This crate defines that contract and provides
//! the rule-based [`ContentFilter`], which screens for:
//!
//! 1. **Size** - too short, too long, too few words
//! 2. **Degenerate output** - character runs, repeated lines, low vocabulary
//! 3. **Prohibited themes** - violence, fear and adult content patterns
//!
//! The filter also screens free-text requests typed by the user so that an
//! inappropriate request is never forwarded to the model.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod content;
mod error;
mod validator;

pub use config::{ContentFilterConfig, SafetyConfig, default_prohibited_patterns};
pub use content::ContentFilter;
pub use error::{SafetyError, SafetyErrorKind, SafetyResult};
pub use validator::{SafetyValidator, Verdict};
