//! Type conversions between Storytime and OpenAI formats.

use crate::openai::{ChatMessage, ChatRequest, ChatResponse, OpenAICompatError};
use storytime_core::{GenerateRequest, GenerateResponse, Output, Role, TokenUsage};

/// Converts a Storytime GenerateRequest to OpenAI chat format.
pub fn to_chat_request(
    req: &GenerateRequest,
    model: &str,
) -> Result<ChatRequest, OpenAICompatError> {
    let messages: Vec<ChatMessage> = req
        .messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => "system",
            };
            ChatMessage {
                role: role.to_string(),
                content: Some(msg.content.clone()),
                refusal: None,
            }
        })
        .collect();

    let mut builder = ChatRequest::builder();
    builder
        .model(req.model.clone().unwrap_or_else(|| model.to_string()))
        .messages(messages);

    if let Some(max_tokens) = req.max_tokens {
        builder.max_tokens(max_tokens);
    }

    if let Some(temp) = req.temperature {
        builder.temperature(temp);
    }

    builder
        .build()
        .map_err(|e| OpenAICompatError::Builder(format!("Failed to build request: {}", e)))
}

/// Converts an OpenAI chat response to a Storytime GenerateResponse.
pub fn from_chat_response(response: &ChatResponse) -> Result<GenerateResponse, OpenAICompatError> {
    let choice = response
        .choices
        .first()
        .ok_or(OpenAICompatError::NoChoices)?;
    let message = &choice.message;

    let mut outputs = Vec::new();
    if let Some(content) = &message.content {
        outputs.push(Output::Text(content.clone()));
    }
    if let Some(refusal) = &message.refusal {
        outputs.push(Output::Refusal(refusal.clone()));
    }

    let usage = response.usage.as_ref().and_then(|u| {
        match (u.prompt_tokens, u.completion_tokens, u.total_tokens) {
            (Some(input), Some(output), Some(total)) => Some(TokenUsage::new(input, output, total)),
            _ => None,
        }
    });

    let truncated = choice.finish_reason.as_deref() == Some("length");

    Ok(GenerateResponse {
        outputs,
        usage,
        truncated,
    })
}
