//! Content filter and `[safety]` section configuration.

use crate::{SafetyError, SafetyErrorKind, SafetyResult};
use serde::{Deserialize, Serialize};

/// Content filter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFilterConfig {
    /// Maximum content length in characters
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Minimum content length in characters
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Minimum number of words
    #[serde(default = "default_min_words")]
    pub min_words: usize,

    /// Lowest accepted share of distinct words in longer texts
    #[serde(default = "default_min_distinct_ratio")]
    pub min_distinct_ratio: f64,

    /// Longest accepted run of one repeated non-space character
    #[serde(default = "default_max_char_run")]
    pub max_char_run: usize,

    /// How often the same line may appear
    #[serde(default = "default_max_repeated_lines")]
    pub max_repeated_lines: usize,

    /// Maximum length of a free-text user request
    #[serde(default = "default_max_request_length")]
    pub max_request_length: usize,

    /// Prohibited regex patterns
    #[serde(default = "default_prohibited_patterns")]
    pub prohibited_patterns: Vec<String>,

    /// Additional patterns appended to `prohibited_patterns`
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

fn default_max_length() -> usize {
    6000
}

fn default_min_length() -> usize {
    20
}

fn default_min_words() -> usize {
    5
}

fn default_min_distinct_ratio() -> f64 {
    0.3
}

fn default_max_char_run() -> usize {
    10
}

fn default_max_repeated_lines() -> usize {
    2
}

fn default_max_request_length() -> usize {
    500
}

/// Patterns for violence, fear-inducing and adult content.
///
/// Mild adventure peril ("a tricky puzzle", "a big storm") is
/// not matched.
pub fn default_prohibited_patterns() -> Vec<String> {
    [
        r"(?i)\b(kill(s|ed|ing|er)?|murder\w*|blood(y|ied)?|stab(s|bed|bing)?|shoot(s|ing)?|shot\s+(him|her|them)|guns?|weapons?|corpses?|gore|tortur\w*)\b",
        r"(?i)\b(terrif(y|ied|ying)|horrif\w*|nightmares?|demons?|haunt(ed|ing)?|monster\s+ate|dead\s+bod(y|ies)|died\s+horribly)\b",
        r"(?i)\b(sex\w*|nude|naked|drunk\w*|beer|whiske?y|cigarettes?|drugs?|damn|hell)\b",
    ]
    .iter()
    .map(|pattern| pattern.to_string())
    .collect()
}

impl Default for ContentFilterConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            min_length: default_min_length(),
            min_words: default_min_words(),
            min_distinct_ratio: default_min_distinct_ratio(),
            max_char_run: default_max_char_run(),
            max_repeated_lines: default_max_repeated_lines(),
            max_request_length: default_max_request_length(),
            prohibited_patterns: default_prohibited_patterns(),
            extra_patterns: Vec::new(),
        }
    }
}

impl ContentFilterConfig {
    /// Bundled and user patterns, in that order.
    pub fn all_patterns(&self) -> impl Iterator<Item = &String> {
        self.prohibited_patterns
            .iter()
            .chain(self.extra_patterns.iter())
    }
}

/// The `[safety]` configuration section.
///
/// # Example
///
/// ```toml
/// [safety]
/// max_length = 6000
/// min_words = 5
/// extra_patterns = ["(?i)\\bzombies?\\b"]
/// judge = true
/// min_quality = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Rule-based filter settings
    #[serde(flatten)]
    pub filter: ContentFilterConfig,

    /// Also ask the model to judge each segment
    #[serde(default)]
    pub judge: bool,

    /// Lowest judge quality score (1 to 5) that still passes
    #[serde(default = "default_min_quality")]
    pub min_quality: u8,
}

fn default_min_quality() -> u8 {
    3
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            filter: ContentFilterConfig::default(),
            judge: false,
            min_quality: default_min_quality(),
        }
    }
}

impl SafetyConfig {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> SafetyResult<()> {
        if !(1..=5).contains(&self.min_quality) {
            return Err(SafetyError::new(SafetyErrorKind::Configuration(format!(
                "min_quality must be between 1 and 5, got {}",
                self.min_quality
            ))));
        }
        if !(0.0..=1.0).contains(&self.filter.min_distinct_ratio) {
            return Err(SafetyError::new(SafetyErrorKind::Configuration(format!(
                "min_distinct_ratio must be between 0 and 1, got {}",
                self.filter.min_distinct_ratio
            ))));
        }
        if self.filter.min_length > self.filter.max_length {
            return Err(SafetyError::new(SafetyErrorKind::Configuration(format!(
                "min_length ({}) exceeds max_length ({})",
                self.filter.min_length, self.filter.max_length
            ))));
        }
        Ok(())
    }
}
