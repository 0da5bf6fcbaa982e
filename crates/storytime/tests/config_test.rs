//! Layered configuration tests.

use std::io::Write;
use std::sync::Arc;
use storytime::{StorytimeConfig, StorytimeErrorKind};
use storytime_core::{GenerateRequest, GenerateResponse};
use storytime_error::StorytimeResult;
use storytime_interface::StoryDriver;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

struct SilentDriver;

#[async_trait::async_trait]
impl StoryDriver for SilentDriver {
    async fn generate(&self, _req: &GenerateRequest) -> StorytimeResult<GenerateResponse> {
        Ok(GenerateResponse::from_text("Once upon a time there was a quiet little cloud."))
    }

    fn provider_name(&self) -> &'static str {
        "silent"
    }

    fn model_name(&self) -> &str {
        "silent-model"
    }
}

#[test]
fn test_bundled_defaults_match_code_defaults() {
    let bundled: StorytimeConfig =
        toml::from_str(include_str!("../../../storytime.toml")).unwrap();
    assert_eq!(bundled, StorytimeConfig::default());
    bundled.validate().unwrap();
}

#[test]
fn test_file_overrides_only_what_it_sets() {
    let file = config_file(
        r#"
[retry]
max_attempts = 5

[safety]
judge = true
extra_patterns = ['(?i)\bspiders?\b']
"#,
    );

    let config = StorytimeConfig::from_file(file.path()).unwrap();

    assert_eq!(*config.retry.max_attempts(), 5);
    assert_eq!(*config.retry.base_delay_ms(), 500);
    assert!(config.safety.judge);
    assert_eq!(config.safety.min_quality, 3);
    assert_eq!(config.safety.filter.extra_patterns.len(), 1);
    assert_eq!(config.safety.filter.prohibited_patterns.len(), 3);
    assert_eq!(config.model.model, "gpt-3.5-turbo");
    assert!(config.session.extract_metadata);
}

#[test]
fn test_explicit_file_layers_over_bundled_defaults() {
    let file = config_file(
        r#"
[model]
model = "gpt-4o-mini"

[session]
max_narrative_chars = 2000
"#,
    );

    let config = StorytimeConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.model.model, "gpt-4o-mini");
    assert_eq!(config.model.request_timeout_secs, 60);
    assert_eq!(config.session.max_narrative_chars, 2000);
    assert_eq!(*config.retry.max_attempts(), 3);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(StorytimeConfig::load(Some(missing.as_path())).is_err());
}

#[test]
fn test_out_of_range_values_are_rejected() {
    for contents in [
        "[retry]\nmax_attempts = 0\n",
        "[retry]\nmax_attempts = 11\n",
        "[retry]\nbase_delay_ms = 1000\nmax_delay_ms = 10\n",
        "[safety]\nmin_quality = 9\n",
        "[session]\nmax_narrative_chars = 0\n",
        "[model]\nrequest_timeout_secs = 0\n",
    ] {
        let file = config_file(contents);
        let err = StorytimeConfig::from_file(file.path()).unwrap_err();
        assert!(
            matches!(err.kind(), StorytimeErrorKind::Config(_)),
            "{contents}: {err}"
        );
    }
}

#[test]
fn test_overrides_replace_model_and_attempts() {
    let config = StorytimeConfig::default()
        .with_model("gpt-4o")
        .with_max_attempts(5);
    assert_eq!(config.model.model, "gpt-4o");
    assert_eq!(*config.retry.max_attempts(), 5);
    assert!(config.validate().is_ok());
    assert!(StorytimeConfig::default().with_max_attempts(0).validate().is_err());
}

#[test]
fn test_build_session_rejects_bad_patterns() {
    let mut config = StorytimeConfig::default();
    config.safety.filter.extra_patterns = vec!["(unclosed".to_string()];

    let err = config.build_session(Arc::new(SilentDriver)).err().unwrap();
    assert!(matches!(err.kind(), StorytimeErrorKind::Config(_)));
}

#[test]
fn test_build_session_with_judge() {
    let mut config = StorytimeConfig::default();
    config.safety.judge = true;
    let session = config.build_session(Arc::new(SilentDriver)).unwrap();
    assert!(!session.is_closed());
}
