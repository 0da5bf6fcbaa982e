//! User actions and the console menu that produces them.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// Something the user asked the story to do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum StoryAction {
    /// Start a story about a topic
    #[display("begin: {}", _0)]
    Begin(String),
    /// Continue the story
    #[display("continue")]
    Continue,
    /// Continue, steering with a hint
    #[display("suggestion: {}", _0)]
    Suggestion(String),
    /// Rewrite the whole story per a change request
    #[display("revise: {}", _0)]
    Revise(String),
    /// Rewrite the whole story in a new tone
    #[display("restyle: {}", _0)]
    Restyle(String),
    /// Introduce a character in the next segment
    #[display("add character: {}", _0)]
    AddCharacter(String),
    /// Move the story somewhere else in the next segment
    #[display("change setting: {}", _0)]
    ChangeSetting(String),
    /// Write the ending
    #[display("end")]
    End,
    /// Throw the story away and start over
    #[display("new story")]
    NewStory,
    /// Leave the program
    #[display("exit")]
    Exit,
}

impl StoryAction {
    /// Short name used in logs and transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            StoryAction::Begin(_) => "begin",
            StoryAction::Continue => "continue",
            StoryAction::Suggestion(_) => "suggestion",
            StoryAction::Revise(_) => "revise",
            StoryAction::Restyle(_) => "restyle",
            StoryAction::AddCharacter(_) => "add character",
            StoryAction::ChangeSetting(_) => "change setting",
            StoryAction::End => "end",
            StoryAction::NewStory => "new story",
            StoryAction::Exit => "exit",
        }
    }

    /// Free text typed by the user, if the action carries any.
    pub fn user_input(&self) -> Option<&str> {
        match self {
            StoryAction::Begin(text)
            | StoryAction::Suggestion(text)
            | StoryAction::Revise(text)
            | StoryAction::Restyle(text)
            | StoryAction::AddCharacter(text)
            | StoryAction::ChangeSetting(text) => Some(text),
            StoryAction::Continue | StoryAction::End | StoryAction::NewStory | StoryAction::Exit => {
                None
            }
        }
    }
}

/// The nine-entry menu shown after every turn.
///
/// # Examples
///
/// ```
/// use storytime_narrative::{MenuChoice, StoryAction};
///
/// assert_eq!(MenuChoice::parse(" 3 "), Some(MenuChoice::Suggest));
/// assert_eq!(MenuChoice::parse("10"), None);
///
/// let action = MenuChoice::AddCharacter.into_action(Some("a wise owl".into()));
/// assert_eq!(action, Some(StoryAction::AddCharacter("a wise owl".into())));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, derive_more::Display,
)]
pub enum MenuChoice {
    /// 1
    #[display("Continue the story")]
    Continue,
    /// 2
    #[display("End the story here")]
    End,
    /// 3
    #[display("Continue with a suggestion")]
    Suggest,
    /// 4
    #[display("Request changes to the story")]
    Revise,
    /// 5
    #[display("Change story tone or style")]
    Restyle,
    /// 6
    #[display("Add a new character")]
    AddCharacter,
    /// 7
    #[display("Change the setting")]
    ChangeSetting,
    /// 8
    #[display("Start a new story")]
    NewStory,
    /// 9
    #[display("Exit")]
    Exit,
}

impl MenuChoice {
    /// Position in the menu, starting at 1.
    pub fn number(self) -> usize {
        Self::iter().position(|choice| choice == self).unwrap_or(0) + 1
    }

    /// Parse a menu number typed by the user.
    pub fn parse(input: &str) -> Option<Self> {
        let number: usize = input.trim().parse().ok()?;
        Self::iter().nth(number.checked_sub(1)?)
    }

    /// Question to ask before this choice can become an action.
    pub fn input_prompt(self) -> Option<&'static str> {
        match self {
            MenuChoice::Suggest => Some("What should happen next?"),
            MenuChoice::Revise => Some("What would you like to change?"),
            MenuChoice::Restyle => Some("What tone or style would you like (e.g. funny, calm, exciting)?"),
            MenuChoice::AddCharacter => Some("Who should join the story?"),
            MenuChoice::ChangeSetting => Some("Where should the story go?"),
            MenuChoice::Continue | MenuChoice::End | MenuChoice::NewStory | MenuChoice::Exit => {
                None
            }
        }
    }

    /// Build the action, given the answer to [`MenuChoice::input_prompt`].
    ///
    /// Returns `None` when the choice needs text and none was supplied.
    pub fn into_action(self, input: Option<String>) -> Option<StoryAction> {
        let needs_text = |wrap: fn(String) -> StoryAction| {
            input
                .clone()
                .filter(|text| !text.trim().is_empty())
                .map(|text| wrap(text.trim().to_string()))
        };
        match self {
            MenuChoice::Continue => Some(StoryAction::Continue),
            MenuChoice::End => Some(StoryAction::End),
            MenuChoice::Suggest => needs_text(StoryAction::Suggestion),
            MenuChoice::Revise => needs_text(StoryAction::Revise),
            MenuChoice::Restyle => needs_text(StoryAction::Restyle),
            MenuChoice::AddCharacter => needs_text(StoryAction::AddCharacter),
            MenuChoice::ChangeSetting => needs_text(StoryAction::ChangeSetting),
            MenuChoice::NewStory => Some(StoryAction::NewStory),
            MenuChoice::Exit => Some(StoryAction::Exit),
        }
    }
}
