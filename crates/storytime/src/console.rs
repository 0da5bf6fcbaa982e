//! The interactive console loop.

use std::io::{BufRead, Write};
use storytime_error::{ConsoleError, ConsoleErrorKind, StorytimeErrorKind, StorytimeResult};
use storytime_narrative::{
    MenuChoice, SessionController, StoryAction, StoryStatus, TurnReport,
};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

const RULE: &str = "--------------------------------------------------";

/// Reads choices from `input` and prints the story to `output`.
///
/// End of input behaves like choosing Exit.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Create a console over any line reader and writer.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect captured output.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the reader exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading or writing the terminal fails.
    #[instrument(skip_all)]
    pub async fn run(&mut self, session: &mut SessionController) -> StorytimeResult<()> {
        self.write_line("Welcome to Storytime!")?;
        while !session.is_closed() {
            let action = match session.state().status() {
                StoryStatus::NotStarted => self.ask_topic()?,
                StoryStatus::Active | StoryStatus::Ended => self.ask_action(session)?,
            };
            let action = match action {
                Some(action) if !session.cancellation_token().is_cancelled() => action,
                _ => StoryAction::Exit,
            };
            debug!(action = action.name(), "Applying action");

            match session.apply(action).await {
                Ok(report) if *report.cancelled() => {
                    self.show(&report, session)?;
                    let report = session.apply(StoryAction::Exit).await?;
                    self.show(&report, session)?;
                }
                Ok(report) => self.show(&report, session)?,
                Err(e) => match e.kind() {
                    StorytimeErrorKind::Story(_) => {
                        self.write_line("That option isn't available right now.")?;
                    }
                    _ => return Err(e),
                },
            }
        }
        Ok(())
    }

    fn ask_topic(&mut self) -> StorytimeResult<Option<StoryAction>> {
        loop {
            self.write_line("\nWhat would you like your story to be about?")?;
            let Some(topic) = self.read_line()? else {
                return Ok(None);
            };
            if !topic.is_empty() {
                return Ok(Some(StoryAction::Begin(topic)));
            }
            self.write_line("Please tell me a topic, like \"a brave little mouse\".")?;
        }
    }

    fn ask_action(&mut self, session: &SessionController) -> StorytimeResult<Option<StoryAction>> {
        loop {
            self.write_menu(*session.state().status())?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let Some(choice) = MenuChoice::parse(&line) else {
                self.write_line("Please enter a number from 1 to 9.")?;
                continue;
            };

            let answer = match choice.input_prompt() {
                Some(question) => {
                    self.write_line(question)?;
                    match self.read_line()? {
                        Some(answer) => Some(answer),
                        None => return Ok(None),
                    }
                }
                None => None,
            };

            match choice.into_action(answer) {
                Some(action) => return Ok(Some(action)),
                None => self.write_line("I need a few words for that one. Let's try again.")?,
            }
        }
    }

    fn show(&mut self, report: &TurnReport, session: &SessionController) -> StorytimeResult<()> {
        if *report.exit() {
            return self.write_line("\nThanks for reading! Goodbye.");
        }
        if *report.cancelled() {
            return self.write_line("\nStopped before the story changed.");
        }
        match report.action() {
            StoryAction::NewStory => self.write_line("\nLet's start a new story!"),
            StoryAction::Revise(_) | StoryAction::Restyle(_) => {
                if report.committed().is_none() {
                    self.write_line("\nThe story stays just as it was.")?;
                }
                self.write_story(&session.state().full_text())
            }
            _ => match report.committed() {
                Some(text) => self.write_story(text),
                None => Ok(()),
            },
        }?;
        if *report.status() == StoryStatus::Ended {
            self.write_line("\nThe story has ended. Start a new one or exit.")?;
        }
        Ok(())
    }

    fn write_menu(&mut self, status: StoryStatus) -> StorytimeResult<()> {
        self.write_line("\nWhat would you like to do next?")?;
        for choice in MenuChoice::iter() {
            let available = match choice {
                MenuChoice::NewStory | MenuChoice::Exit => true,
                _ => status == StoryStatus::Active,
            };
            if available {
                self.write_line(&format!("{}. {}", choice.number(), choice))?;
            }
        }
        Ok(())
    }

    fn write_story(&mut self, text: &str) -> StorytimeResult<()> {
        self.write_line(&format!("\n{RULE}\n{text}\n{RULE}"))
    }

    fn write_line(&mut self, line: &str) -> StorytimeResult<()> {
        writeln!(self.output, "{}", line)
            .and_then(|_| self.output.flush())
            .map_err(|e| ConsoleError::new(ConsoleErrorKind::Write(e.to_string())))?;
        Ok(())
    }

    /// Next trimmed line, or `None` at end of input.
    fn read_line(&mut self) -> StorytimeResult<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| ConsoleError::new(ConsoleErrorKind::Read(e.to_string())))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
