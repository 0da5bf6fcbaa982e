//! Data transfer objects for OpenAI-compatible APIs.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storytime_error::ModelErrorKind;

/// A message in the OpenAI chat format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content; absent when the model refused
    #[serde(default)]
    pub content: Option<String>,
    /// Refusal explanation from models that support it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

/// OpenAI chat completion request.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl ChatRequest {
    /// Creates a new builder for ChatRequest.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// A choice in the OpenAI response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The message content
    pub message: ChatMessage,
    /// Reason for finishing
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    /// Total tokens
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

/// OpenAI chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Response choices
    pub choices: Vec<ChatChoice>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

/// Errors from OpenAI-compatible APIs.
#[derive(Debug, Clone, derive_more::Display)]
pub enum OpenAICompatError {
    /// Network failure or timeout before a status arrived
    #[display("HTTP error: {}", _0)]
    Http(String),

    /// API returned an error status
    #[display("API error (status {}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Response contained no choices
    #[display("Response contained no choices")]
    NoChoices,

    /// Failed to parse response
    #[display("Response parsing failed: {}", _0)]
    ResponseParsing(String),

    /// Builder error
    #[display("Builder error: {}", _0)]
    Builder(String),
}

impl std::error::Error for OpenAICompatError {}

impl OpenAICompatError {
    /// Map onto the retry classification shared by all providers.
    ///
    /// # Examples
    ///
    /// ```
    /// use storytime_error::ModelErrorKind;
    /// use storytime_models::OpenAICompatError;
    ///
    /// let err = OpenAICompatError::Api { status: 429, message: "slow down".into() };
    /// assert!(matches!(err.classify(), ModelErrorKind::RateLimited(_)));
    ///
    /// let err = OpenAICompatError::Http("connection reset".into());
    /// assert!(matches!(err.classify(), ModelErrorKind::Transient(_)));
    /// ```
    pub fn classify(&self) -> ModelErrorKind {
        match self {
            OpenAICompatError::Http(msg) => ModelErrorKind::Transient(msg.clone()),
            OpenAICompatError::Api { status, message } => {
                ModelErrorKind::from_status(*status, message.clone())
            }
            OpenAICompatError::NoChoices => ModelErrorKind::EmptyResponse,
            OpenAICompatError::ResponseParsing(_) | OpenAICompatError::Builder(_) => {
                ModelErrorKind::Fatal(self.to_string())
            }
        }
    }
}
