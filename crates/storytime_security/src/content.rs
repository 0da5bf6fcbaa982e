//! Rule-based content filtering for generated story text.

use crate::{
    ContentFilterConfig, SafetyError, SafetyErrorKind, SafetyResult, SafetyValidator, Verdict,
};
use async_trait::async_trait;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Texts shorter than this many words skip the vocabulary check.
const DISTINCT_RATIO_MIN_WORDS: usize = 30;

/// Content filter for validating model-generated story text.
///
/// # Examples
///
/// ```
/// use storytime_security::{ContentFilter, ContentFilterConfig};
///
/// let filter = ContentFilter::new(ContentFilterConfig::default()).unwrap();
/// assert!(filter.check("The little mouse shared her acorn with the sleepy owl.").is_pass());
/// assert!(!filter.check("The knight drew his weapon and the blood spilled.").is_pass());
/// ```
#[derive(Debug, Clone)]
pub struct ContentFilter {
    config: ContentFilterConfig,
    prohibited: Vec<(String, Regex)>,
}

impl ContentFilter {
    /// Create a new content filter with the given configuration.
    pub fn new(config: ContentFilterConfig) -> SafetyResult<Self> {
        let mut prohibited = Vec::new();
        for pattern in config.all_patterns() {
            match Regex::new(pattern) {
                Ok(regex) => prohibited.push((pattern.clone(), regex)),
                Err(e) => {
                    return Err(SafetyError::new(SafetyErrorKind::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    }));
                }
            }
        }

        Ok(Self { config, prohibited })
    }

    /// Check generated text and explain the first rule it breaks.
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    pub fn check(&self, content: &str) -> Verdict {
        debug!("Filtering content");
        let content = content.trim();

        let length = content.chars().count();
        if length < self.config.min_length {
            return Verdict::fail(format!(
                "Content is shorter than {} characters (got {})",
                self.config.min_length, length
            ));
        }
        if length > self.config.max_length {
            return Verdict::fail(format!(
                "Content exceeds maximum length of {} characters (got {})",
                self.config.max_length, length
            ));
        }

        let words = words(content);
        if words.len() < self.config.min_words {
            return Verdict::fail(format!(
                "Content has fewer than {} words (got {})",
                self.config.min_words,
                words.len()
            ));
        }

        if let Some(reason) = self.degenerate(content, &words) {
            debug!(%reason, "Content looks degenerate");
            return Verdict::Fail(reason);
        }

        if let Some(verdict) = self.match_prohibited(content) {
            return verdict;
        }

        debug!("Content passed all filters");
        Verdict::Pass
    }

    /// Screen a free-text request before it is folded into a prompt.
    ///
    /// Requests are short, so only blankness, length and prohibited themes
    /// are checked.
    #[instrument(skip(self, input), fields(input_len = input.len()))]
    pub fn screen(&self, input: &str) -> Verdict {
        let input = input.trim();
        if input.is_empty() {
            return Verdict::fail("Request is empty");
        }
        let length = input.chars().count();
        if length > self.config.max_request_length {
            return Verdict::fail(format!(
                "Request exceeds maximum length of {} characters (got {})",
                self.config.max_request_length, length
            ));
        }
        self.match_prohibited(input).unwrap_or(Verdict::Pass)
    }

    fn match_prohibited(&self, content: &str) -> Option<Verdict> {
        self.prohibited
            .iter()
            .enumerate()
            .find(|(_, (_, regex))| regex.is_match(content))
            .map(|(i, (pattern, _))| {
                debug!(pattern_index = i, "Content matches prohibited pattern");
                Verdict::fail(format!("Content matches prohibited pattern: {}", pattern))
            })
    }

    fn degenerate(&self, content: &str, words: &[String]) -> Option<String> {
        let run = longest_char_run(content);
        if run > self.config.max_char_run {
            return Some(format!(
                "Content repeats a single character {} times in a row",
                run
            ));
        }

        let mut line_counts: HashMap<&str, usize> = HashMap::new();
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            *line_counts.entry(line).or_default() += 1;
        }
        if let Some((line, count)) = line_counts
            .into_iter()
            .find(|(_, count)| *count > self.config.max_repeated_lines)
        {
            return Some(format!(
                "Content repeats the line '{}' {} times",
                truncate(line, 40),
                count
            ));
        }

        if words.len() >= DISTINCT_RATIO_MIN_WORDS {
            let distinct = words.iter().collect::<HashSet<_>>().len();
            let ratio = distinct as f64 / words.len() as f64;
            if ratio < self.config.min_distinct_ratio {
                return Some(format!(
                    "Content vocabulary is too repetitive ({:.2} distinct word ratio)",
                    ratio
                ));
            }
        }

        None
    }

    /// Get the configuration.
    pub fn config(&self) -> &ContentFilterConfig {
        &self.config
    }
}

#[async_trait]
impl SafetyValidator for ContentFilter {
    async fn validate(&self, text: &str) -> Verdict {
        self.check(text)
    }

    fn screen_request(&self, input: &str) -> Verdict {
        self.screen(input)
    }
}

/// Lowercased words with surrounding punctuation removed.
fn words(content: &str) -> Vec<String> {
    content
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn longest_char_run(content: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;
    for ch in content.chars() {
        if ch.is_whitespace() {
            previous = None;
            current = 0;
            continue;
        }
        if previous == Some(ch) {
            current += 1;
        } else {
            previous = Some(ch);
            current = 1;
        }
        longest = longest.max(current);
    }
    longest
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
