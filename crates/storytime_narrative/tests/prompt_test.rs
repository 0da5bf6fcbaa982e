//! Prompt composition tests.

use storytime_core::Role;
use storytime_narrative::{PromptComposer, StoryAction, StoryState};

fn state() -> StoryState {
    let mut state = StoryState::default();
    state
        .seed("a brave little mouse", "Pip lived under the oak tree.")
        .unwrap();
    state.append_segment("One day Pip found an acorn.").unwrap();
    state.add_character("Pip").unwrap();
    state.set_setting("a quiet meadow").unwrap();
    state
}

#[test]
fn test_opening_prompt() {
    let prompt = PromptComposer::default()
        .compose(
            &StoryState::default(),
            &StoryAction::Begin("a brave little mouse".into()),
        )
        .unwrap();

    assert!(prompt.instruction().contains("a brave little mouse"));
    assert!(prompt.instruction().contains("200-400 words"));
    assert!(prompt.system().contains("children"));
    assert_eq!(*prompt.max_tokens(), 500);
}

#[test]
fn test_continuation_includes_story_details() {
    let prompt = PromptComposer::default()
        .compose(&state(), &StoryAction::Suggestion("they meet a frog".into()))
        .unwrap();

    let instruction = prompt.instruction();
    assert!(instruction.contains("Pip lived under the oak tree."));
    assert!(instruction.contains("One day Pip found an acorn."));
    assert!(instruction.contains("CHARACTERS: Pip"));
    assert!(instruction.contains("SETTING: a quiet meadow"));
    assert!(instruction.contains("they meet a frog"));
}

#[test]
fn test_context_is_bounded_to_recent_story() {
    let composer = PromptComposer::new(19);
    let prompt = composer.compose(&state(), &StoryAction::Continue).unwrap();
    assert!(!prompt.instruction().contains("oak tree"));
    assert!(prompt.instruction().contains("...Pip found an acorn."));

    let rewrite = composer
        .compose(&state(), &StoryAction::Revise("add a rainbow".into()))
        .unwrap();
    assert!(rewrite.instruction().contains("Pip lived under the oak tree."));
    assert_eq!(*rewrite.max_tokens(), 1000);
}

#[test]
fn test_rewrite_budget_grows_with_the_story() {
    let mut state = state();
    let paragraph = "Pip and Olive shared their acorns with every friend they met. ".repeat(8);
    for _ in 0..8 {
        state.append_segment(paragraph.as_str()).unwrap();
    }
    let composer = PromptComposer::default();

    let revise = composer
        .compose(&state, &StoryAction::Revise("add a rainbow".into()))
        .unwrap();
    let restyle = composer
        .compose(&state, &StoryAction::Restyle("funny".into()))
        .unwrap();
    let story_tokens = (state.full_text().chars().count() / 4) as u32;

    assert!(*revise.max_tokens() > story_tokens);
    assert!(*revise.max_tokens() > 1000);
    assert_eq!(revise.max_tokens(), restyle.max_tokens());

    for _ in 0..40 {
        state.append_segment(paragraph.as_str()).unwrap();
    }
    let capped = composer
        .compose(&state, &StoryAction::Revise("add a rainbow".into()))
        .unwrap();
    assert_eq!(*capped.max_tokens(), 4000);
}

#[test]
fn test_each_story_action_has_its_own_prompt() {
    let composer = PromptComposer::default();
    let state = state();
    let actions = [
        StoryAction::Continue,
        StoryAction::Suggestion("a hint".into()),
        StoryAction::Revise("a change".into()),
        StoryAction::Restyle("funny".into()),
        StoryAction::AddCharacter("a wise owl".into()),
        StoryAction::ChangeSetting("a sunny beach".into()),
        StoryAction::End,
    ];
    let instructions: Vec<String> = actions
        .iter()
        .map(|action| composer.compose(&state, action).unwrap().instruction().clone())
        .collect();
    for (i, a) in instructions.iter().enumerate() {
        for b in &instructions[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert!(instructions[6].contains("The End."));
}

#[test]
fn test_actions_without_model_call_have_no_prompt() {
    let composer = PromptComposer::default();
    assert!(composer.compose(&state(), &StoryAction::NewStory).is_none());
    assert!(composer.compose(&state(), &StoryAction::Exit).is_none());
}

#[test]
fn test_composition_is_deterministic() {
    let composer = PromptComposer::default();
    let action = StoryAction::AddCharacter("a wise owl".into());
    assert_eq!(
        composer.compose(&state(), &action),
        composer.compose(&state(), &action)
    );
}

#[test]
fn test_request_carries_system_and_user_messages() {
    let prompt = PromptComposer::default()
        .compose(&state(), &StoryAction::Continue)
        .unwrap();
    let request = prompt.to_request();

    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[1].role, Role::User);
    assert_eq!(request.max_tokens, Some(500));
    assert_eq!(request.temperature, Some(0.7));
}

#[test]
fn test_safer_prompt_keeps_settings() {
    let prompt = PromptComposer::default()
        .compose(&state(), &StoryAction::End)
        .unwrap();
    let safer = prompt.safer("too scary");

    assert!(safer.instruction().contains("too scary"));
    assert_eq!(safer.max_tokens(), prompt.max_tokens());
    assert_eq!(safer.system(), prompt.system());
}

#[test]
fn test_helper_prompts_ask_for_json() {
    let composer = PromptComposer::default();
    let metadata = composer.metadata_extraction("Pip lived under the oak tree.");
    assert!(metadata.instruction().contains("\"characters\""));
    assert_eq!(*metadata.temperature(), 0.1);

    let judge = composer.judge("Pip lived under the oak tree.");
    assert!(judge.instruction().contains("\"verdict\""));
    assert_eq!(*judge.max_tokens(), 400);
}
