//! Prompt templates for every story turn.

use crate::{StoryAction, StoryState};
use derive_getters::Getters;
use storytime_core::{GenerateRequest, Message};

/// System instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "You are a warm children's storyteller. You write \
    engaging, gentle stories for children aged 5 to 10 using simple vocabulary and positive \
    themes such as kindness, friendship and curiosity. You never include violence, scary \
    content or grown-up themes; mild adventure peril that ends well is the most tension \
    you allow.";

const AGE_GUIDANCE: &str = "Keep everything appropriate for children aged 5-10: simple, clear \
    language, positive themes and no violence or fear beyond mild adventure peril.";

const PLAIN_TEXT: &str = "Respond with the story text only, without titles, headings or notes.";

/// A fully composed model request.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Prompt {
    /// Fixed storyteller instruction
    system: String,
    /// Turn-specific instruction
    instruction: String,
    /// Output token budget
    max_tokens: u32,
    /// Sampling temperature
    temperature: f32,
}

impl Prompt {
    fn new(instruction: String, max_tokens: u32, temperature: f32) -> Self {
        Self {
            system: SYSTEM_INSTRUCTION.to_string(),
            instruction,
            max_tokens,
            temperature,
        }
    }

    /// The same prompt with a "make it safer" block appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use storytime_narrative::{PromptComposer, StoryAction, StoryState};
    ///
    /// let composer = PromptComposer::default();
    /// let prompt = composer
    ///     .compose(&StoryState::default(), &StoryAction::Begin("a dragon".into()))
    ///     .unwrap();
    /// let safer = prompt.safer("mentions a weapon");
    ///
    /// assert!(safer.instruction().starts_with(prompt.instruction().as_str()));
    /// assert!(safer.instruction().contains("mentions a weapon"));
    /// ```
    pub fn safer(&self, reason: &str) -> Self {
        let instruction = format!(
            "{}\n\nIMPORTANT: A previous attempt was rejected.\n\
             Reason: {}\n\
             Write a gentler, complete version that avoids this while keeping the story \
             kind, calm and positive.",
            self.instruction, reason
        );
        Self {
            instruction,
            ..self.clone()
        }
    }

    /// Provider-neutral request for this prompt.
    pub fn to_request(&self) -> GenerateRequest {
        GenerateRequest::new(vec![
            Message::system(self.system.clone()),
            Message::user(self.instruction.clone()),
        ])
        .with_max_tokens(self.max_tokens)
        .with_temperature(self.temperature)
    }
}

/// Builds prompts from the story state and the requested action.
///
/// Composition is pure: the same state and action always give the same
/// prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptComposer {
    max_context_chars: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(8000)
    }
}

impl PromptComposer {
    /// Composer that shows at most `max_context_chars` of recent story as context.
    pub fn new(max_context_chars: usize) -> Self {
        Self { max_context_chars }
    }

    /// Prompt for a story action; `None` for actions that need no model call.
    pub fn compose(&self, state: &StoryState, action: &StoryAction) -> Option<Prompt> {
        let prompt = match action {
            StoryAction::Begin(topic) => self.opening(topic),
            StoryAction::Continue => self.continuation(state, None),
            StoryAction::Suggestion(hint) => self.continuation(state, Some(hint.as_str())),
            StoryAction::Revise(request) => self.revision(state, request),
            StoryAction::Restyle(tone) => self.restyle(state, tone),
            StoryAction::AddCharacter(name) => self.new_character(state, name),
            StoryAction::ChangeSetting(place) => self.new_setting(state, place),
            StoryAction::End => self.ending(state),
            StoryAction::NewStory | StoryAction::Exit => return None,
        };
        Some(prompt)
    }

    fn opening(&self, topic: &str) -> Prompt {
        let instruction = format!(
            "Write the opening of a new story.\n\n\
             STORY REQUEST: {topic}\n\n\
             The opening should be 200-400 words and should:\n\
             - Introduce 1-2 main characters with clear, memorable names\n\
             - Set up a gentle adventure or friendly problem to solve\n\
             - Establish a safe, welcoming setting\n\
             - End at a natural pause where the story could continue\n\n\
             {AGE_GUIDANCE}\n{PLAIN_TEXT}"
        );
        Prompt::new(instruction, 500, 0.7)
    }

    fn continuation(&self, state: &StoryState, hint: Option<&str>) -> Prompt {
        let hint = hint
            .map(|hint| format!("\nSTEERING HINT FROM THE READER: {hint}\nFold this hint naturally into the next part.\n"))
            .unwrap_or_default();
        let instruction = format!(
            "Continue this story.\n\n{}{hint}\n\
             Write the next segment (150-300 words) that:\n\
             - Stays consistent with the characters, setting and tone\n\
             - Advances the plot naturally\n\
             - Ends at a natural pause\n\n\
             {AGE_GUIDANCE}\n{PLAIN_TEXT}",
            self.context(state)
        );
        Prompt::new(instruction, 500, 0.7)
    }

    fn new_character(&self, state: &StoryState, name: &str) -> Prompt {
        let instruction = format!(
            "Continue this story by introducing a new character.\n\n{}\n\
             NEW CHARACTER: {name}\n\n\
             Write the next segment (150-300 words) in which {name} joins the story \
             naturally, fits in with the existing characters and is friendly and positive.\n\n\
             {AGE_GUIDANCE}\n{PLAIN_TEXT}",
            self.context(state)
        );
        Prompt::new(instruction, 500, 0.7)
    }

    fn new_setting(&self, state: &StoryState, place: &str) -> Prompt {
        let instruction = format!(
            "Continue this story by moving it to a new place.\n\n{}\n\
             NEW SETTING: {place}\n\n\
             Write the next segment (150-300 words) in which the characters travel to \
             {place}. Make the change feel natural and exciting, and keep every character \
             true to their personality.\n\n\
             {AGE_GUIDANCE}\n{PLAIN_TEXT}",
            self.context(state)
        );
        Prompt::new(instruction, 500, 0.7)
    }

    fn ending(&self, state: &StoryState) -> Prompt {
        let instruction = format!(
            "Write a satisfying conclusion to this story.\n\n{}\n\
             The ending (150-300 words) should:\n\
             - Resolve the adventure positively and tie up the established plot threads\n\
             - Show what the characters learned\n\
             - Finish warmly with the words \"The End.\"\n\n\
             {AGE_GUIDANCE}\n{PLAIN_TEXT}",
            self.context(state)
        );
        Prompt::new(instruction, 500, 0.7)
    }

    fn revision(&self, state: &StoryState, request: &str) -> Prompt {
        let instruction = format!(
            "The reader wants to change this story.\n\n{}\n\
             CHANGE REQUEST: {request}\n\n\
             Rewrite the entire story so it includes the change while keeping its flow, \
             its characters and their personalities. Return the complete revised story.\n\n\
             {AGE_GUIDANCE}\n{PLAIN_TEXT}",
            self.whole_story(state)
        );
        Prompt::new(instruction, rewrite_budget(state), 0.6)
    }

    fn restyle(&self, state: &StoryState, tone: &str) -> Prompt {
        let instruction = format!(
            "The reader wants this story told in a different tone or style.\n\n{}\n\
             NEW TONE OR STYLE: {tone}\n\n\
             Rewrite the entire story in the new tone while keeping the same characters and \
             plot. Return the complete rewritten story.\n\n\
             {AGE_GUIDANCE}\n{PLAIN_TEXT}",
            self.whole_story(state)
        );
        Prompt::new(instruction, rewrite_budget(state), 0.6)
    }

    /// Prompt asking for characters, setting and tone of an opening as JSON.
    pub fn metadata_extraction(&self, opening: &str) -> Prompt {
        let instruction = format!(
            "Extract key information from this story opening.\n\n\
             STORY OPENING:\n{opening}\n\n\
             Respond with valid JSON only, in exactly this format:\n\
             {{\"characters\": [\"name1\", \"name2\"], \
             \"setting\": \"brief description of the place\", \
             \"tone\": \"one word such as Adventure, Friendship or Learning\"}}"
        );
        Prompt::new(instruction, 200, 0.1)
    }

    /// Prompt asking for a JSON safety verdict on a candidate segment.
    pub fn judge(&self, candidate: &str) -> Prompt {
        let instruction = format!(
            "You are a child safety expert. Evaluate this story text for children aged 5-10.\n\n\
             TEXT TO EVALUATE:\n{candidate}\n\n\
             Check that it has no violence, aggression or scary content, no inappropriate \
             language or behaviour, no emotional themes beyond the age range, uses language \
             suitable for 5-10 year olds, promotes good values and is a coherent, engaging \
             story.\n\n\
             Respond with valid JSON only, in exactly this format:\n\
             {{\"verdict\": \"SAFE\" or \"UNSAFE\", \"quality_score\": 1-5, \
             \"concerns\": [\"...\"], \"suggestions\": [\"...\"]}}"
        );
        Prompt::new(instruction, 400, 0.1)
    }

    /// Recent story plus the known characters, setting and tone.
    fn context(&self, state: &StoryState) -> String {
        format!(
            "STORY SO FAR:\n{}\n\n{}",
            tail(&state.full_text(), self.max_context_chars),
            details(state)
        )
    }

    /// The entire story; rewrites replace it, so it is never shortened.
    fn whole_story(&self, state: &StoryState) -> String {
        format!("CURRENT STORY:\n{}\n\n{}", state.full_text(), details(state))
    }
}

/// Output tokens for a rewrite: room for the whole story plus some growth.
///
/// Roughly four characters per token; never below 1000, capped at 4000.
fn rewrite_budget(state: &StoryState) -> u32 {
    let story_tokens = u32::try_from(state.full_text().chars().count() / 4).unwrap_or(u32::MAX);
    story_tokens
        .saturating_add(story_tokens / 2)
        .saturating_add(200)
        .clamp(1000, 4000)
}

fn details(state: &StoryState) -> String {
    let characters = if state.characters().is_empty() {
        "Continue with the existing characters".to_string()
    } else {
        state.characters().join(", ")
    };
    format!(
        "CHARACTERS: {}\nSETTING: {}\nTONE: {}\n",
        characters,
        state.setting().as_deref().unwrap_or("As established in the story"),
        state.tone().as_deref().unwrap_or("Warm and friendly"),
    )
}

/// The last `max_chars` characters of `text`, marked when shortened.
fn tail(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }
    let skip = total - max_chars;
    let start = text
        .char_indices()
        .nth(skip)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    format!("...{}", &text[start..])
}
