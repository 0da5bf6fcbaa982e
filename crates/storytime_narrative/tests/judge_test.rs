//! Model-backed judge validator tests.

mod test_utils;

use std::sync::Arc;
use storytime_narrative::{JudgeValidator, StoryAction};
use storytime_security::{ContentFilter, ContentFilterConfig, SafetyValidator};
use test_utils::{ScriptedDriver, executor, fatal, session_with, text};

const CANDIDATE: &str = "Pip and Olive shared a picnic of berries under the old oak tree.";

fn judge(driver: Arc<ScriptedDriver>, min_quality: u8) -> JudgeValidator {
    let filter = ContentFilter::new(ContentFilterConfig::default()).unwrap();
    JudgeValidator::new(filter, executor(driver), min_quality)
}

#[tokio::test]
async fn test_safe_verdict_passes() {
    let driver = ScriptedDriver::new(vec![text(
        r#"{"verdict": "SAFE", "quality_score": 4, "concerns": [], "suggestions": []}"#,
    )]);
    let judge = judge(driver.clone(), 3);

    assert!(judge.validate(CANDIDATE).await.is_pass());
    assert_eq!(driver.calls(), 1);
    assert!(driver.instructions()[0].contains(CANDIDATE));
}

#[tokio::test]
async fn test_unsafe_verdict_fails_with_concerns() {
    let driver = ScriptedDriver::new(vec![text(
        "```json\n{\"verdict\": \"UNSAFE\", \"quality_score\": 4, \"concerns\": [\"the storm is too frightening\"]}\n```",
    )]);
    let verdict = judge(driver, 3).validate(CANDIDATE).await;

    assert!(verdict.reason().unwrap().contains("too frightening"));
}

#[tokio::test]
async fn test_low_quality_fails() {
    let driver = ScriptedDriver::new(vec![text(r#"{"verdict": "SAFE", "quality_score": 2}"#)]);
    assert!(!judge(driver, 3).validate(CANDIDATE).await.is_pass());
}

#[tokio::test]
async fn test_filter_rejection_skips_the_model() {
    let driver = ScriptedDriver::new(vec![text(r#"{"verdict": "SAFE", "quality_score": 5}"#)]);
    let judge = judge(driver.clone(), 3);

    let verdict = judge
        .validate("The pirate waved his gun at the crew and everyone ran away.")
        .await;

    assert!(!verdict.is_pass());
    assert_eq!(driver.calls(), 0);
}

#[tokio::test]
async fn test_unavailable_judge_fails_closed() {
    let driver = ScriptedDriver::new(vec![fatal()]);
    let verdict = judge(driver, 1).validate(CANDIDATE).await;
    assert!(verdict.reason().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn test_unreadable_answer_fails_closed() {
    let driver = ScriptedDriver::new(vec![text("Looks lovely to me, nothing to worry about.")]);
    assert!(!judge(driver, 1).validate(CANDIDATE).await.is_pass());
}

#[tokio::test]
async fn test_requests_are_screened_by_the_filter() {
    let driver = ScriptedDriver::new(vec![text("unused")]);
    let judge = judge(driver.clone(), 3);

    assert!(judge.screen_request("a friendly dragon").is_pass());
    assert!(!judge.screen_request("a haunted house").is_pass());
    assert_eq!(driver.calls(), 0);
}

#[tokio::test]
async fn test_safer_retry_receives_judge_suggestions() {
    let driver = ScriptedDriver::new(vec![
        text(CANDIDATE),
        text(
            r#"{"verdict": "UNSAFE", "quality_score": 3, "concerns": ["the storm is too loud"], "suggestions": ["make the storm a gentle rain"]}"#,
        ),
        text(CANDIDATE),
        text(r#"{"verdict": "SAFE", "quality_score": 4}"#),
    ]);
    let validator = judge(driver.clone(), 3);
    let mut session = session_with(driver.clone(), Box::new(validator), false);

    let report = session
        .apply(StoryAction::Begin("a rainy day".into()))
        .await
        .unwrap();

    assert!(!report.used_fallback());
    assert_eq!(driver.calls(), 4);
    let retry = &driver.instructions()[2];
    assert!(retry.contains("the storm is too loud"));
    assert!(retry.contains("make the storm a gentle rain"));
}
