//! Story state transition tests.

use storytime_error::StoryErrorKind;
use storytime_narrative::{StoryAction, StoryState, StoryStatus};

fn active() -> StoryState {
    let mut state = StoryState::default();
    state
        .seed("a brave little mouse", "Pip lived under the oak tree.")
        .unwrap();
    state
}

#[test]
fn test_seed_starts_story() {
    let state = active();
    assert_eq!(*state.status(), StoryStatus::Active);
    assert_eq!(state.topic().as_deref(), Some("a brave little mouse"));
    assert_eq!(state.segment_count(), 1);
}

#[test]
fn test_seed_twice_is_rejected() {
    let mut state = active();
    let err = state.seed("another", "Another opening.").unwrap_err();
    assert!(matches!(err.kind, StoryErrorKind::InvalidTransition { .. }));
    assert_eq!(state.narrative(), &vec!["Pip lived under the oak tree.".to_string()]);
}

#[test]
fn test_blank_segments_are_rejected() {
    let mut state = active();
    let err = state.append_segment("   \n ").unwrap_err();
    assert_eq!(err.kind, StoryErrorKind::EmptySegment);
    assert_eq!(state.segment_count(), 1);

    let err = StoryState::default().seed("topic", "").unwrap_err();
    assert_eq!(err.kind, StoryErrorKind::EmptySegment);
}

#[test]
fn test_mutations_require_active_story() {
    let mut state = StoryState::default();
    assert_eq!(
        state.append_segment("Too early.").unwrap_err().kind,
        StoryErrorKind::NotStarted
    );
    assert_eq!(
        state.add_character("Pip").unwrap_err().kind,
        StoryErrorKind::NotStarted
    );

    let mut state = active();
    state.mark_ended().unwrap();
    assert_eq!(
        state.append_segment("Too late.").unwrap_err().kind,
        StoryErrorKind::Ended
    );
    assert_eq!(state.set_tone("funny").unwrap_err().kind, StoryErrorKind::Ended);
    assert_eq!(*state.status(), StoryStatus::Ended);
}

#[test]
fn test_replace_narrative_collapses_segments() {
    let mut state = active();
    state.append_segment("Pip found an acorn.").unwrap();
    state
        .replace_narrative("Pip, a cheerful mouse, found a shiny acorn.")
        .unwrap();
    assert_eq!(state.segment_count(), 1);
    assert_eq!(state.full_text(), "Pip, a cheerful mouse, found a shiny acorn.");
}

#[test]
fn test_characters_are_normalized_and_deduplicated() {
    let mut state = active();
    assert!(state.add_character("a wise owl").unwrap());
    assert!(!state.add_character("The Wise Owl.").unwrap());
    assert!(state.add_character("Pip").unwrap());
    assert_eq!(
        state.characters(),
        &vec!["wise owl".to_string(), "Pip".to_string()]
    );

    let err = state.add_character(" ! ").unwrap_err();
    assert!(matches!(err.kind, StoryErrorKind::MissingValue(_)));
}

#[test]
fn test_choices_are_recorded_in_order() {
    let mut state = StoryState::default();
    assert!(state.record_choice(StoryAction::Continue).is_err());

    let mut state = active();
    state.record_choice(StoryAction::Continue).unwrap();
    state.record_choice(StoryAction::End).unwrap();
    state.mark_ended().unwrap();
    assert_eq!(
        state.choices(),
        &vec![StoryAction::Continue, StoryAction::End]
    );
}

#[test]
fn test_reset_clears_every_field() {
    let mut state = active();
    state.add_character("Olive").unwrap();
    state.set_setting("a snowy hill").unwrap();
    state.set_tone("calm").unwrap();
    state.record_choice(StoryAction::Continue).unwrap();
    state.mark_ended().unwrap();

    state.reset();

    assert_eq!(state, StoryState::default());
    assert_eq!(*state.status(), StoryStatus::NotStarted);
}

#[test]
fn test_state_round_trips_through_json() {
    let mut state = active();
    state.add_character("Olive").unwrap();
    let json = serde_json::to_string(&state).unwrap();
    let restored: StoryState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
}
