//! Client for OpenAI-compatible chat completion APIs.
//!
//! Any provider following the OpenAI chat completions format works here;
//! only the endpoint, model and key variable change.

mod client;
mod conversions;
mod driver;
mod dto;

pub use client::OpenAICompatibleClient;
pub use driver::OpenAIDriver;
pub use dto::{ChatMessage, ChatRequest, ChatResponse, OpenAICompatError};
