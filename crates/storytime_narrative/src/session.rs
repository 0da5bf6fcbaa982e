//! The session controller: one story, one action at a time.

use crate::{
    Prompt, PromptComposer, SessionConfig, StoryAction, StoryMetadata, StoryState, StoryStatus,
    fallback, parse_json,
};
use derive_getters::Getters;
use std::sync::Arc;
use storytime_error::{StoryError, StoryErrorKind, StorytimeResult};
use storytime_rate_limit::{ExecutionOutcome, ExhaustionReason, Generation, RetryExecutor};
use storytime_security::{SafetyValidator, Verdict};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

const INCOMPLETE_OUTPUT: &str =
    "incomplete output: the text stopped at the length limit; write a shorter, complete version";

/// Why a turn used canned content instead of model text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum FallbackReason {
    /// The user's free text was rejected before any model call
    #[display("request rejected: {}", _0)]
    RequestRejected(String),
    /// The executor could not obtain text
    #[display("model unavailable: {}", _0)]
    ModelUnavailable(String),
    /// Generated text failed validation twice
    #[display("unsafe content: {}", _0)]
    UnsafeContent(String),
}

/// What happened during one [`SessionController::apply`] call.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TurnReport {
    /// The action that was applied
    action: StoryAction,
    /// Story status after the turn
    status: StoryStatus,
    /// Text committed to the story this turn, model-written or canned
    committed: Option<String>,
    /// Set when canned content stood in for model text
    fallback: Option<FallbackReason>,
    /// Model attempts spent on the turn
    attempts: u32,
    /// The model call was cancelled and nothing was committed
    cancelled: bool,
    /// The session has terminated
    exit: bool,
}

impl TurnReport {
    fn new(action: StoryAction, status: StoryStatus) -> Self {
        Self {
            action,
            status,
            committed: None,
            fallback: None,
            attempts: 0,
            cancelled: false,
            exit: false,
        }
    }

    /// True when canned content was used.
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Text that survived generation and validation.
struct Accepted {
    text: String,
    attempts: u32,
}

/// Why no accepted text was produced. No reason means the call was cancelled.
struct Rejected {
    reason: Option<FallbackReason>,
    attempts: u32,
}

/// Drives a single story through its lifecycle.
///
/// Each model-backed action runs prompt composition, execution and
/// validation, and commits to [`StoryState`] only once validation passed.
/// Validation failure gets one retry with a safer prompt; after that, or when
/// the executor gives up, canned content from [`fallback`] is committed
/// instead. Neither case is an error: `apply` only fails for actions that are
/// not valid in the current status, and then the state is untouched.
pub struct SessionController {
    state: StoryState,
    executor: Arc<RetryExecutor>,
    validator: Box<dyn SafetyValidator>,
    composer: PromptComposer,
    config: SessionConfig,
    closed: bool,
}

impl SessionController {
    /// Create a controller with an empty story.
    pub fn new(
        executor: Arc<RetryExecutor>,
        validator: Box<dyn SafetyValidator>,
        config: SessionConfig,
    ) -> Self {
        Self {
            state: StoryState::default(),
            executor,
            validator,
            composer: PromptComposer::new(config.max_narrative_chars),
            config,
            closed: false,
        }
    }

    /// The story so far.
    pub fn state(&self) -> &StoryState {
        &self.state
    }

    /// True after [`StoryAction::Exit`].
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Token that aborts the model call in flight.
    ///
    /// A cancelled turn commits nothing, and later calls return immediately
    /// as cancelled too.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.executor.cancellation_token()
    }

    /// Apply one user action.
    ///
    /// # Errors
    ///
    /// Returns [`StoryErrorKind::InvalidTransition`] when the action is not
    /// allowed in the current status or the session is closed.
    #[instrument(skip(self), fields(status = %self.state.status()))]
    pub async fn apply(&mut self, action: StoryAction) -> StorytimeResult<TurnReport> {
        self.check_transition(&action)?;

        match action {
            StoryAction::Exit => {
                info!("Session closed");
                self.closed = true;
                let mut report = TurnReport::new(action, *self.state.status());
                report.exit = true;
                Ok(report)
            }
            StoryAction::NewStory => {
                info!("Starting over");
                self.state.reset();
                Ok(TurnReport::new(action, *self.state.status()))
            }
            action => self.generate_turn(action).await,
        }
    }

    async fn generate_turn(&mut self, action: StoryAction) -> StorytimeResult<TurnReport> {
        let screened = match action.user_input().map(|input| self.validator.screen_request(input)) {
            Some(Verdict::Fail(reason)) => {
                warn!(action = action.name(), %reason, "Request rejected");
                Err(Rejected {
                    reason: Some(FallbackReason::RequestRejected(reason)),
                    attempts: 0,
                })
            }
            _ => Ok(()),
        };

        let outcome = match (screened, self.composer.compose(&self.state, &action)) {
            (Err(rejected), _) => Err(rejected),
            (Ok(()), Some(prompt)) => self.generate(&prompt).await,
            (Ok(()), None) => return Ok(TurnReport::new(action, *self.state.status())),
        };

        let mut report = match outcome {
            Ok(accepted) => self.commit(action, accepted).await?,
            Err(rejected) => self.degrade(action, rejected)?,
        };
        report.status = *self.state.status();
        Ok(report)
    }

    /// Execute, validate, and on failure try once more with a safer prompt.
    async fn generate(&self, prompt: &Prompt) -> Result<Accepted, Rejected> {
        let first = self.executor.execute(&prompt.to_request()).await;
        let mut attempts = first.attempts();
        let generation = into_generation(first, attempts)?;

        let reason = match self.review(&generation).await {
            Verdict::Pass => {
                return Ok(Accepted {
                    text: generation.into_text(),
                    attempts,
                });
            }
            Verdict::Fail(reason) => reason,
        };
        warn!(%reason, "Generated text failed validation, retrying with a safer prompt");

        let second = self.executor.execute(&prompt.safer(&reason).to_request()).await;
        attempts += second.attempts();
        let generation = into_generation(second, attempts)?;

        match self.review(&generation).await {
            Verdict::Pass => Ok(Accepted {
                text: generation.into_text(),
                attempts,
            }),
            Verdict::Fail(reason) => Err(Rejected {
                reason: Some(FallbackReason::UnsafeContent(reason)),
                attempts,
            }),
        }
    }

    /// Text cut off at the token limit never reaches the story.
    async fn review(&self, generation: &Generation) -> Verdict {
        if *generation.truncated() {
            return Verdict::fail(INCOMPLETE_OUTPUT);
        }
        self.validator.validate(generation.text()).await
    }

    async fn commit(
        &mut self,
        action: StoryAction,
        accepted: Accepted,
    ) -> StorytimeResult<TurnReport> {
        let Accepted { text, mut attempts } = accepted;
        match &action {
            StoryAction::Begin(topic) => {
                self.state.seed(topic.as_str(), text.as_str())?;
                if self.config.extract_metadata {
                    attempts += self.extract_metadata(&text).await;
                }
            }
            StoryAction::Continue | StoryAction::Suggestion(_) => {
                self.state.append_segment(text.as_str())?;
            }
            StoryAction::AddCharacter(name) => {
                self.state.add_character(name)?;
                self.state.append_segment(text.as_str())?;
            }
            StoryAction::ChangeSetting(place) => {
                self.state.set_setting(place.as_str())?;
                self.state.append_segment(text.as_str())?;
            }
            StoryAction::Revise(_) => self.state.replace_narrative(text.as_str())?,
            StoryAction::Restyle(tone) => {
                self.state.set_tone(tone.as_str())?;
                self.state.replace_narrative(text.as_str())?;
            }
            StoryAction::End => {
                self.state.append_segment(text.as_str())?;
                self.state.mark_ended()?;
            }
            StoryAction::NewStory | StoryAction::Exit => {}
        }
        self.state.record_choice(action.clone())?;
        info!(
            action = action.name(),
            chars = text.len(),
            segments = self.state.segment_count(),
            attempts,
            "Committed model text"
        );

        let mut report = TurnReport::new(action, *self.state.status());
        report.committed = Some(text);
        report.attempts = attempts;
        Ok(report)
    }

    fn degrade(&mut self, action: StoryAction, rejected: Rejected) -> StorytimeResult<TurnReport> {
        let Rejected { reason, attempts } = rejected;
        let Some(reason) = reason else {
            warn!(action = action.name(), "Turn cancelled, nothing committed");
            let mut report = TurnReport::new(action, *self.state.status());
            report.cancelled = true;
            report.attempts = attempts;
            return Ok(report);
        };
        warn!(action = action.name(), %reason, "Using fallback content");

        let committed = match &action {
            StoryAction::Begin(topic) => {
                let topic = match &reason {
                    FallbackReason::RequestRejected(_) => fallback::TOPIC,
                    _ => topic.as_str(),
                };
                self.state.seed(topic, fallback::OPENING)?;
                for name in fallback::OPENING_CHARACTERS {
                    self.state.add_character(name)?;
                }
                self.state.set_setting(fallback::OPENING_SETTING)?;
                Some(fallback::OPENING)
            }
            StoryAction::Continue
            | StoryAction::Suggestion(_)
            | StoryAction::AddCharacter(_)
            | StoryAction::ChangeSetting(_) => {
                self.state.append_segment(fallback::CONTINUATION)?;
                Some(fallback::CONTINUATION)
            }
            StoryAction::End => {
                self.state.append_segment(fallback::ENDING)?;
                self.state.mark_ended()?;
                Some(fallback::ENDING)
            }
            StoryAction::Revise(_)
            | StoryAction::Restyle(_)
            | StoryAction::NewStory
            | StoryAction::Exit => None,
        };
        self.state.record_choice(action.clone())?;

        let mut report = TurnReport::new(action, *self.state.status());
        report.committed = committed.map(str::to_string);
        report.fallback = Some(reason);
        report.attempts = attempts;
        Ok(report)
    }

    /// Ask the model who and where the opening is about. Returns attempts spent.
    async fn extract_metadata(&mut self, opening: &str) -> u32 {
        let request = self.composer.metadata_extraction(opening).to_request();
        let outcome = self.executor.execute(&request).await;
        let attempts = outcome.attempts();

        let metadata = match outcome {
            ExecutionOutcome::Success(generation) => {
                match parse_json::<StoryMetadata>(generation.text()) {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        debug!(error = %e, "Ignoring unreadable story metadata");
                        return attempts;
                    }
                }
            }
            ExecutionOutcome::Exhausted(failure) => {
                debug!(%failure, "Story metadata unavailable");
                return attempts;
            }
        };

        for name in &metadata.characters {
            if !self.validator.screen_request(name).is_pass() {
                debug!(%name, "Ignoring rejected character from metadata");
            } else if let Err(e) = self.state.add_character(name) {
                debug!(%name, error = %e, "Ignoring unusable character from metadata");
            }
        }
        if let Some(setting) = metadata.setting {
            if !self.validator.screen_request(&setting).is_pass() {
                debug!(%setting, "Ignoring rejected setting from metadata");
            } else if let Err(e) = self.state.set_setting(setting) {
                debug!(error = %e, "Ignoring unusable setting from metadata");
            }
        }
        if let Some(tone) = metadata.tone {
            if !self.validator.screen_request(&tone).is_pass() {
                debug!(%tone, "Ignoring rejected tone from metadata");
            } else if let Err(e) = self.state.set_tone(tone) {
                debug!(error = %e, "Ignoring unusable tone from metadata");
            }
        }
        debug!(
            characters = self.state.characters().len(),
            "Applied story metadata"
        );
        attempts
    }

    fn check_transition(&self, action: &StoryAction) -> Result<(), StoryError> {
        let status = *self.state.status();
        let allowed = !self.closed
            && match action {
                StoryAction::Exit => true,
                StoryAction::Begin(_) => status == StoryStatus::NotStarted,
                StoryAction::NewStory => status != StoryStatus::NotStarted,
                _ => status == StoryStatus::Active,
            };
        if allowed {
            return Ok(());
        }
        let status = if self.closed {
            "closed".to_string()
        } else {
            status.to_string()
        };
        Err(StoryError::new(StoryErrorKind::InvalidTransition {
            action: action.name().to_string(),
            status,
        }))
    }
}

fn into_generation(outcome: ExecutionOutcome, attempts: u32) -> Result<Generation, Rejected> {
    match outcome {
        ExecutionOutcome::Success(generation) => Ok(generation),
        ExecutionOutcome::Exhausted(failure) => {
            let reason = match failure.reason() {
                ExhaustionReason::Cancelled => None,
                _ => Some(FallbackReason::ModelUnavailable(failure.to_string())),
            };
            Err(Rejected { reason, attempts })
        }
    }
}
