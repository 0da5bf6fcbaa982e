//! Trait definitions for Storytime.
//!
//! The story session only ever talks to a language model through
//! [`StoryDriver`], so tests can substitute scripted drivers and the binary
//! can pick any provider that speaks the contract.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::StoryDriver;
