//! Message types for model conversations.

use crate::Role;
use serde::{Deserialize, Serialize};

/// A single text message in a model conversation.
///
/// # Examples
///
/// ```
/// use storytime_core::{Message, Role};
///
/// let message = Message::user("Tell me a story about a mouse.");
/// assert_eq!(message.role, Role::User);
/// assert!(message.content.contains("mouse"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The text of the message
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}
