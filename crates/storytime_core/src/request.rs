//! Request and response types for model generation.

use crate::{Message, Output, TokenUsage};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// Provider-neutral generation request.
///
/// # Examples
///
/// ```
/// use storytime_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::new(vec![
///     Message::system("You are a children's storyteller."),
///     Message::user("Begin a story about a brave little mouse."),
/// ])
/// .with_max_tokens(500)
/// .with_temperature(0.7);
///
/// assert_eq!(request.messages.len(), 2);
/// assert_eq!(request.max_tokens, Some(500));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Setters)]
#[setters(prefix = "with_", strip_option)]
pub struct GenerateRequest {
    /// The conversation messages to send
    #[setters(skip)]
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Model identifier overriding the driver default
    #[setters(into)]
    pub model: Option<String>,
}

impl GenerateRequest {
    /// Create a request from messages with provider defaults for everything else.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use storytime_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse::from_text("Once upon a time...");
/// assert_eq!(response.joined_text(), "Once upon a time...");
/// assert_eq!(response.outputs.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
    /// Token accounting, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// The model stopped at its output token limit
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl GenerateResponse {
    /// Response holding a single text output.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            outputs: vec![Output::Text(text.into())],
            usage: None,
            truncated: false,
        }
    }

    /// Mark whether the output was cut off by the token limit.
    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    /// All text outputs joined together and trimmed.
    pub fn joined_text(&self) -> String {
        self.outputs
            .iter()
            .filter_map(Output::as_text)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}
