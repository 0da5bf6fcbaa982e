//! Tests for the content filter through the validator contract.

use storytime_security::{
    ContentFilter, ContentFilterConfig, SafetyConfig, SafetyErrorKind, SafetyValidator, Verdict,
};

const OPENING: &str = "Once upon a time, a brave little mouse named Pip lived under a big \
    oak tree. Every morning she watered the daisies and said good morning to the bees.";

#[tokio::test]
async fn test_validator_passes_gentle_story() {
    let filter = ContentFilter::new(ContentFilterConfig::default()).unwrap();
    let validator: &dyn SafetyValidator = &filter;

    assert_eq!(validator.validate(OPENING).await, Verdict::Pass);
}

#[tokio::test]
async fn test_validator_reports_reason() {
    let filter = ContentFilter::new(ContentFilterConfig::default()).unwrap();
    let validator: Box<dyn SafetyValidator> = Box::new(filter);

    let verdict = validator
        .validate("The dragon wanted to kill every villager in the valley.")
        .await;

    assert!(!verdict.is_pass());
    assert!(verdict.reason().unwrap().contains("prohibited pattern"));
}

#[test]
fn test_screen_request_through_trait() {
    let filter = ContentFilter::new(ContentFilterConfig::default()).unwrap();
    let validator: &dyn SafetyValidator = &filter;

    assert!(validator.screen_request("finds a magical acorn").is_pass());
    assert!(!validator.screen_request("the owl drinks whiskey").is_pass());
}

#[test]
fn test_extra_patterns_extend_defaults() {
    let config = ContentFilterConfig {
        extra_patterns: vec![r"(?i)\bzombies?\b".to_string()],
        ..Default::default()
    };
    let filter = ContentFilter::new(config).unwrap();

    assert!(
        !filter
            .check("A friendly zombie waved at the children from the garden gate.")
            .is_pass()
    );
    assert!(
        !filter
            .check("The pirate drew a gun from his belt and frowned at the sea.")
            .is_pass()
    );
}

#[test]
fn test_invalid_pattern_is_rejected() {
    let config = ContentFilterConfig {
        extra_patterns: vec!["(unclosed".to_string()],
        ..Default::default()
    };
    let err = ContentFilter::new(config).unwrap_err();
    assert!(matches!(err.kind(), SafetyErrorKind::InvalidPattern { .. }));
}

#[test]
fn test_safety_section_from_toml() {
    let config: SafetyConfig = toml::from_str(
        r#"
max_length = 3000
min_words = 8
extra_patterns = ["(?i)\\bspiders?\\b"]
judge = true
min_quality = 4
"#,
    )
    .unwrap();

    assert_eq!(config.filter.max_length, 3000);
    assert_eq!(config.filter.min_words, 8);
    assert_eq!(config.filter.min_length, 20);
    assert!(!config.filter.prohibited_patterns.is_empty());
    assert_eq!(config.filter.extra_patterns.len(), 1);
    assert!(config.judge);
    assert_eq!(config.min_quality, 4);
    assert!(config.validate().is_ok());
}

#[test]
fn test_safety_section_validation() {
    let config = SafetyConfig {
        min_quality: 6,
        ..Default::default()
    };
    assert!(config.validate().is_err());

    let config = SafetyConfig {
        filter: ContentFilterConfig {
            min_distinct_ratio: 1.5,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());

    assert!(SafetyConfig::default().validate().is_ok());
}
