//! The `[session]` configuration section.

use serde::{Deserialize, Serialize};

/// Session behaviour settings.
///
/// # Example
///
/// ```toml
/// [session]
/// extract_metadata = true
/// max_narrative_chars = 8000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Ask the model for characters, setting and tone after the opening
    #[serde(default = "default_true")]
    pub extract_metadata: bool,

    /// Most recent story characters included as context in prompts
    #[serde(default = "default_max_narrative_chars")]
    pub max_narrative_chars: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_narrative_chars() -> usize {
    8000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            extract_metadata: true,
            max_narrative_chars: default_max_narrative_chars(),
        }
    }
}
