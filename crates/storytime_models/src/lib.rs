//! Language model providers for Storytime.
//!
//! Storytime talks to any endpoint that speaks the OpenAI chat completions
//! format. [`OpenAIDriver`] wraps the HTTP client, classifies provider
//! failures into rate limits, transient faults and fatal errors, and
//! implements [`StoryDriver`](storytime_interface::StoryDriver).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod openai;

pub use config::ModelConfig;
pub use openai::{
    ChatMessage, ChatRequest, ChatResponse, OpenAICompatError, OpenAICompatibleClient,
    OpenAIDriver,
};
