//! A safety validator that asks the model to review candidate text.

use crate::{PromptComposer, parse_json};
use async_trait::async_trait;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storytime_rate_limit::{ExecutionOutcome, RetryExecutor};
use storytime_security::{ContentFilter, SafetyValidator, Verdict};
use tracing::{debug, instrument, warn};

/// The model's structured opinion of a candidate segment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct JudgeReport {
    /// `SAFE` or `UNSAFE`
    #[serde(default)]
    verdict: String,
    /// Overall quality from 1 to 5
    #[serde(default = "lowest_score")]
    quality_score: u8,
    /// Problems the judge noticed
    #[serde(default)]
    concerns: Vec<String>,
    /// How the text could be improved
    #[serde(default)]
    suggestions: Vec<String>,
}

fn lowest_score() -> u8 {
    1
}

impl JudgeReport {
    /// Whether the judge called the text safe.
    pub fn is_safe(&self) -> bool {
        self.verdict.trim().eq_ignore_ascii_case("safe")
    }

    /// Verdict for a required minimum quality.
    ///
    /// A failing reason carries the judge's suggestions so a retry prompt can
    /// act on them.
    pub fn verdict_for(&self, min_quality: u8) -> Verdict {
        let problem = if !self.is_safe() {
            let concerns = if self.concerns.is_empty() {
                "no details given".to_string()
            } else {
                self.concerns.join("; ")
            };
            format!("judged unsafe: {}", concerns)
        } else if self.quality_score < min_quality {
            format!(
                "quality score {} is below the required {}",
                self.quality_score, min_quality
            )
        } else {
            return Verdict::Pass;
        };

        if self.suggestions.is_empty() {
            Verdict::Fail(problem)
        } else {
            Verdict::fail(format!(
                "{}\nSuggestions: {}",
                problem,
                self.suggestions.join("; ")
            ))
        }
    }
}

/// Runs the rule-based filter, then asks the model for a second opinion.
///
/// Text the filter rejects never reaches the model. When the judge call
/// fails or its answer cannot be parsed, the text is rejected.
pub struct JudgeValidator {
    filter: ContentFilter,
    executor: Arc<RetryExecutor>,
    composer: PromptComposer,
    min_quality: u8,
}

impl JudgeValidator {
    /// Create a judge that shares the session's executor.
    pub fn new(filter: ContentFilter, executor: Arc<RetryExecutor>, min_quality: u8) -> Self {
        Self {
            filter,
            executor,
            composer: PromptComposer::default(),
            min_quality,
        }
    }

    /// Ask the model to review `text`.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn review(&self, text: &str) -> Result<JudgeReport, String> {
        let request = self.composer.judge(text).to_request();
        match self.executor.execute(&request).await {
            ExecutionOutcome::Success(generation) => {
                parse_json::<JudgeReport>(generation.text()).map_err(|e| {
                    warn!(error = %e, "Judge answer was not valid JSON");
                    "safety review answer could not be read".to_string()
                })
            }
            ExecutionOutcome::Exhausted(failure) => {
                warn!(%failure, "Judge call failed");
                Err(format!("safety review unavailable: {}", failure))
            }
        }
    }
}

#[async_trait]
impl SafetyValidator for JudgeValidator {
    async fn validate(&self, content: &str) -> Verdict {
        let verdict = self.filter.check(content);
        if !verdict.is_pass() {
            return verdict;
        }
        match self.review(content).await {
            Ok(report) => {
                debug!(
                    verdict = %report.verdict,
                    quality = report.quality_score,
                    "Judge reviewed content"
                );
                report.verdict_for(self.min_quality)
            }
            Err(reason) => Verdict::fail(reason),
        }
    }

    fn screen_request(&self, input: &str) -> Verdict {
        self.filter.screen(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(verdict: &str, score: u8) -> JudgeReport {
        JudgeReport {
            verdict: verdict.to_string(),
            quality_score: score,
            concerns: vec!["too scary".to_string()],
            suggestions: Vec::new(),
        }
    }

    #[test]
    fn test_safe_report_passes() {
        assert!(report("SAFE", 4).verdict_for(3).is_pass());
        assert!(report(" safe ", 3).verdict_for(3).is_pass());
    }

    #[test]
    fn test_unsafe_report_fails_with_concerns() {
        let verdict = report("UNSAFE", 5).verdict_for(3);
        assert!(verdict.reason().unwrap_or_default().contains("too scary"));
    }

    #[test]
    fn test_low_quality_fails() {
        assert!(!report("SAFE", 2).verdict_for(3).is_pass());
    }

    #[test]
    fn test_suggestions_are_part_of_the_reason() {
        let mut report = report("UNSAFE", 4);
        report.suggestions = vec!["make the storm a gentle rain".to_string()];
        let reason = report.verdict_for(3).reason().unwrap_or_default().to_string();
        assert!(reason.contains("too scary"));
        assert!(reason.contains("Suggestions: make the storm a gentle rain"));
    }

    #[test]
    fn test_missing_fields_default_to_failing_values() {
        let report: JudgeReport = serde_json::from_str("{}").unwrap();
        assert!(!report.is_safe());
        assert_eq!(report.quality_score, 1);
    }
}
