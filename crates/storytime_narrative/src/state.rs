//! The evolving story and its transitions.

use crate::StoryAction;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storytime_error::{StoryError, StoryErrorKind};
use tracing::debug;

/// Lifecycle of a story.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum StoryStatus {
    /// No segment has been committed yet
    #[default]
    #[display("not started")]
    NotStarted,
    /// The story is being told
    #[display("active")]
    Active,
    /// The story has reached its ending
    #[display("ended")]
    Ended,
}

/// Everything known about the story being told.
///
/// Each mutation validates its preconditions first and either applies fully
/// or returns an error with the state untouched.
///
/// # Examples
///
/// ```
/// use storytime_narrative::{StoryState, StoryStatus};
///
/// let mut state = StoryState::default();
/// state.seed("a brave little mouse", "Pip lived under the oak tree.").unwrap();
/// state.append_segment("One day Pip found an acorn.").unwrap();
///
/// assert_eq!(*state.status(), StoryStatus::Active);
/// assert_eq!(state.segment_count(), 2);
/// assert_eq!(
///     state.full_text(),
///     "Pip lived under the oak tree.\n\nOne day Pip found an acorn."
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
pub struct StoryState {
    /// Committed segments in reading order
    narrative: Vec<String>,
    /// Character names in the order they were introduced
    characters: Vec<String>,
    /// Where the story takes place
    setting: Option<String>,
    /// Tone or style requested for the story
    tone: Option<String>,
    /// What the user asked the story to be about
    topic: Option<String>,
    /// Lifecycle position
    status: StoryStatus,
    /// Actions applied to this story so far
    choices: Vec<StoryAction>,
}

impl StoryState {
    /// Commit the opening segment of a new story.
    pub fn seed(
        &mut self,
        topic: impl Into<String>,
        opening: impl Into<String>,
    ) -> Result<(), StoryError> {
        if self.status != StoryStatus::NotStarted {
            return Err(self.invalid("seed"));
        }
        let topic = non_blank(topic.into(), "topic")?;
        let opening = segment(opening.into())?;

        debug!(topic = %topic, "Seeding story");
        self.topic = Some(topic);
        self.narrative = vec![opening];
        self.status = StoryStatus::Active;
        Ok(())
    }

    /// Append a segment to an active story.
    pub fn append_segment(&mut self, text: impl Into<String>) -> Result<(), StoryError> {
        self.require_active()?;
        let text = segment(text.into())?;
        self.narrative.push(text);
        Ok(())
    }

    /// Replace the whole narrative with a rewritten version.
    pub fn replace_narrative(&mut self, text: impl Into<String>) -> Result<(), StoryError> {
        self.require_active()?;
        let text = segment(text.into())?;
        self.narrative = vec![text];
        Ok(())
    }

    /// Register a character. Returns false if the name was already known.
    ///
    /// Names are normalized with [`normalize_character_name`] and compared
    /// case-insensitively.
    pub fn add_character(&mut self, name: &str) -> Result<bool, StoryError> {
        self.require_active()?;
        let name = non_blank(normalize_character_name(name), "character")?;
        if self
            .characters
            .iter()
            .any(|known| known.eq_ignore_ascii_case(&name))
        {
            return Ok(false);
        }
        debug!(character = %name, "Adding character");
        self.characters.push(name);
        Ok(true)
    }

    /// Replace the setting.
    pub fn set_setting(&mut self, value: impl Into<String>) -> Result<(), StoryError> {
        self.require_active()?;
        self.setting = Some(non_blank(value.into(), "setting")?);
        Ok(())
    }

    /// Replace the tone.
    pub fn set_tone(&mut self, value: impl Into<String>) -> Result<(), StoryError> {
        self.require_active()?;
        self.tone = Some(non_blank(value.into(), "tone")?);
        Ok(())
    }

    /// Log an applied action.
    pub fn record_choice(&mut self, action: StoryAction) -> Result<(), StoryError> {
        if self.status == StoryStatus::NotStarted {
            return Err(StoryError::new(StoryErrorKind::NotStarted));
        }
        self.choices.push(action);
        Ok(())
    }

    /// Conclude an active story.
    pub fn mark_ended(&mut self) -> Result<(), StoryError> {
        self.require_active()?;
        self.status = StoryStatus::Ended;
        Ok(())
    }

    /// Forget everything and return to `NotStarted`.
    pub fn reset(&mut self) {
        debug!("Resetting story state");
        *self = Self::default();
    }

    /// Segments joined by blank lines.
    pub fn full_text(&self) -> String {
        self.narrative.join("\n\n")
    }

    /// Number of committed segments.
    pub fn segment_count(&self) -> usize {
        self.narrative.len()
    }

    /// Most recently committed segment.
    pub fn last_segment(&self) -> Option<&str> {
        self.narrative.last().map(String::as_str)
    }

    fn require_active(&self) -> Result<(), StoryError> {
        match self.status {
            StoryStatus::Active => Ok(()),
            StoryStatus::NotStarted => Err(StoryError::new(StoryErrorKind::NotStarted)),
            StoryStatus::Ended => Err(StoryError::new(StoryErrorKind::Ended)),
        }
    }

    #[track_caller]
    fn invalid(&self, action: &str) -> StoryError {
        StoryError::new(StoryErrorKind::InvalidTransition {
            action: action.to_string(),
            status: self.status.to_string(),
        })
    }
}

/// Canonical form of a character name.
///
/// Surrounding whitespace and trailing punctuation are dropped, as is a
/// leading article.
///
/// # Examples
///
/// ```
/// use storytime_narrative::normalize_character_name;
///
/// assert_eq!(normalize_character_name("a wise owl"), "wise owl");
/// assert_eq!(normalize_character_name("  The Friendly Dragon. "), "Friendly Dragon");
/// assert_eq!(normalize_character_name("Benny"), "Benny");
/// ```
pub fn normalize_character_name(name: &str) -> String {
    let name = name
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ',' | ';' | ':'))
        .trim();
    let lower = name.to_lowercase();
    let stripped = ["a ", "an ", "the "]
        .iter()
        .find(|article| lower.starts_with(*article))
        .and_then(|article| name.get(article.len()..))
        .unwrap_or(name);
    stripped.trim().to_string()
}

fn non_blank(value: String, what: &str) -> Result<String, StoryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoryError::new(StoryErrorKind::MissingValue(what.to_string())));
    }
    Ok(value.to_string())
}

fn segment(text: String) -> Result<String, StoryError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StoryError::new(StoryErrorKind::EmptySegment));
    }
    Ok(text.to_string())
}
