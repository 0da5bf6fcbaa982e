//! Canned content must always satisfy the default content filter.

use storytime_narrative::fallback;
use storytime_security::{ContentFilter, ContentFilterConfig, Verdict};

fn filter() -> ContentFilter {
    ContentFilter::new(ContentFilterConfig::default()).unwrap()
}

#[test]
fn test_fallback_segments_pass_default_filter() {
    let filter = filter();
    for (name, text) in [
        ("OPENING", fallback::OPENING),
        ("CONTINUATION", fallback::CONTINUATION),
        ("ENDING", fallback::ENDING),
    ] {
        assert_eq!(filter.check(text), Verdict::Pass, "{name} was rejected");
    }
}

#[test]
fn test_fallback_details_pass_request_screening() {
    let filter = filter();
    let details = fallback::OPENING_CHARACTERS
        .iter()
        .copied()
        .chain([fallback::OPENING_SETTING, fallback::TOPIC]);
    for value in details {
        assert_eq!(filter.screen(value), Verdict::Pass, "{value} was rejected");
    }
}

#[test]
fn test_fallback_ending_closes_the_story() {
    assert!(fallback::ENDING.trim_end().ends_with("The End."));
}
