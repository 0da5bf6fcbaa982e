//! Output types from model responses.

use serde::{Deserialize, Serialize};

/// A piece of content returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Generated text.
    Text(String),

    /// The model declined to answer; the payload is its explanation.
    Refusal(String),
}

impl Output {
    /// The generated text, if this output carries any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Output::Text(text) => Some(text),
            Output::Refusal(_) => None,
        }
    }
}
