//! Core data types for Storytime.
//!
//! These are the provider-neutral request and response shapes that travel
//! between the story session and whichever language model backs it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod message;
mod output;
mod request;
mod role;
mod token_usage;

pub use message::Message;
pub use output::Output;
pub use request::{GenerateRequest, GenerateResponse};
pub use role::Role;
pub use token_usage::TokenUsage;
