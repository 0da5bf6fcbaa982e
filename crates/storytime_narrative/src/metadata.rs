//! Characters, setting and tone reported by the model for an opening.

use serde::{Deserialize, Serialize};

/// Metadata the model extracted from a story opening.
///
/// Missing fields default to empty, so a partial answer is still useful.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoryMetadata {
    /// Named characters
    #[serde(default)]
    pub characters: Vec<String>,
    /// Brief description of the place
    #[serde(default)]
    pub setting: Option<String>,
    /// One-word tone or theme
    #[serde(default, alias = "theme")]
    pub tone: Option<String>,
}
