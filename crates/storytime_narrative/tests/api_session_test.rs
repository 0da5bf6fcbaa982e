//! End-to-end session against a real model.
//!
//! Run with: cargo test --package storytime_narrative --features api

use std::sync::Arc;
use storytime_models::{ModelConfig, OpenAIDriver};
use storytime_narrative::{SessionConfig, SessionController, StoryAction, StoryStatus};
use storytime_rate_limit::{RetryConfig, RetryExecutor};
use storytime_security::{ContentFilter, ContentFilterConfig, SafetyValidator};

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)] // Requires OPENAI_API_KEY
async fn test_real_model_story_session() {
    let _ = dotenvy::dotenv();
    let driver = Arc::new(
        OpenAIDriver::from_env(&ModelConfig::default()).expect("OPENAI_API_KEY not set"),
    );
    let executor = Arc::new(RetryExecutor::new(driver, RetryConfig::default()));
    let filter = ContentFilter::new(ContentFilterConfig::default()).unwrap();
    let checker = ContentFilter::new(ContentFilterConfig::default()).unwrap();
    let mut session = SessionController::new(executor, Box::new(filter), SessionConfig::default());

    session
        .apply(StoryAction::Begin("a brave little mouse".into()))
        .await
        .expect("begin failed");
    session
        .apply(StoryAction::AddCharacter("a wise owl".into()))
        .await
        .expect("add character failed");
    let report = session.apply(StoryAction::End).await.expect("end failed");

    assert_eq!(*report.status(), StoryStatus::Ended);
    assert!(session.state().characters().iter().any(|c| c == "wise owl"));
    for segment in session.state().narrative() {
        assert!(checker.validate(segment).await.is_pass());
    }
}
