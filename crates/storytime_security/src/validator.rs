//! The validator contract shared by every safety check.

use async_trait::async_trait;

/// Outcome of a safety check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Verdict {
    /// The text may be shown to a child
    #[display("pass")]
    Pass,
    /// The text was rejected; the payload says why
    #[display("fail: {}", _0)]
    Fail(String),
}

impl Verdict {
    /// Build a failing verdict.
    pub fn fail(reason: impl Into<String>) -> Self {
        Verdict::Fail(reason.into())
    }

    /// True when the text passed.
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(reason) => Some(reason),
        }
    }
}

/// Decides whether text is appropriate for children aged 5 to 10.
///
/// A validator never errors: anything it cannot decide is a [`Verdict::Fail`].
#[async_trait]
pub trait SafetyValidator: Send + Sync {
    /// Check model output before it reaches the story.
    async fn validate(&self, text: &str) -> Verdict;

    /// Check a free-text request typed by the user before it reaches a prompt.
    fn screen_request(&self, _input: &str) -> Verdict {
        Verdict::Pass
    }
}
