//! Test utilities for story session tests.
//!
//! Provides a scripted model driver and helpers that wire a session around it.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use storytime_core::{GenerateRequest, GenerateResponse};
use storytime_error::{ModelError, ModelErrorKind, StorytimeResult};
use storytime_interface::StoryDriver;
use storytime_narrative::{SessionConfig, SessionController};
use storytime_rate_limit::{RetryConfig, RetryExecutor};
use storytime_security::{ContentFilter, ContentFilterConfig, SafetyValidator};

/// One scripted driver response.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Reply {
    /// Return this text
    Text(String),
    /// Return this text cut off at the token limit
    Cut(String),
    /// Fail with this classified error
    Fail(ModelErrorKind),
}

/// Shorthand for a successful reply.
#[allow(dead_code)]
pub fn text(value: &str) -> Reply {
    Reply::Text(value.to_string())
}

/// Shorthand for a reply cut off at the token limit.
#[allow(dead_code)]
pub fn cut(value: &str) -> Reply {
    Reply::Cut(value.to_string())
}

/// Shorthand for a fatal provider error.
#[allow(dead_code)]
pub fn fatal() -> Reply {
    Reply::Fail(ModelErrorKind::Fatal("HTTP 400: bad request".to_string()))
}

/// Driver that replays replies in order, then repeats the last one.
///
/// Every request it receives is recorded so tests can inspect prompts.
pub struct ScriptedDriver {
    replies: Mutex<VecDeque<Reply>>,
    last: Reply,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedDriver {
    /// Create a driver from a non-empty script.
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        let last = replies.last().cloned().expect("script must not be empty");
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            last,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Number of generate calls so far.
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// User instruction of every request, in order.
    #[allow(dead_code)]
    pub fn instructions(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|req| req.messages.last().map(|m| m.content.clone()))
            .collect()
    }
}

#[async_trait]
impl StoryDriver for ScriptedDriver {
    async fn generate(&self, req: &GenerateRequest) -> StorytimeResult<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.clone());
        match reply {
            Reply::Text(text) => Ok(GenerateResponse::from_text(text)),
            Reply::Cut(text) => Ok(GenerateResponse::from_text(text).with_truncated(true)),
            Reply::Fail(kind) => Err(ModelError::new(kind).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Executor with fast, small retry settings.
pub fn executor(driver: Arc<ScriptedDriver>) -> Arc<RetryExecutor> {
    let config = RetryConfig::default()
        .with_max_attempts(2)
        .with_base_delay_ms(10)
        .with_max_delay_ms(20);
    Arc::new(RetryExecutor::new(driver, config))
}

/// Session without metadata extraction, using the default content filter.
#[allow(dead_code)]
pub fn session(driver: Arc<ScriptedDriver>) -> SessionController {
    let filter = ContentFilter::new(ContentFilterConfig::default()).unwrap();
    session_with(driver, Box::new(filter), false)
}

/// Session with an explicit validator and metadata setting.
#[allow(dead_code)]
pub fn session_with(
    driver: Arc<ScriptedDriver>,
    validator: Box<dyn SafetyValidator>,
    extract_metadata: bool,
) -> SessionController {
    let config = SessionConfig {
        extract_metadata,
        ..SessionConfig::default()
    };
    SessionController::new(executor(driver), validator, config)
}
