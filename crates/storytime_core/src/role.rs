//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Who authored a message in a model conversation.
///
/// # Examples
///
/// ```
/// use storytime_core::Role;
///
/// assert_ne!(Role::User, Role::Assistant);
/// assert_eq!(format!("{}", Role::System), "System");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// System messages carry the fixed storyteller instruction
    System,
    /// User messages carry the composed prompt
    User,
    /// Assistant messages are from the model
    Assistant,
}
