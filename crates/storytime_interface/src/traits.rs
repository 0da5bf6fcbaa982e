//! Trait definitions for language model backends.

use async_trait::async_trait;
use std::sync::Arc;
use storytime_core::{GenerateRequest, GenerateResponse};
use storytime_error::StorytimeResult;

/// Core trait that every language model backend implements.
///
/// Implementations should report provider failures as
/// [`storytime_error::ModelError`] so callers can tell rate limits and
/// transient faults apart from fatal ones.
#[async_trait]
pub trait StoryDriver: Send + Sync {
    /// Generate model output for a request.
    async fn generate(&self, req: &GenerateRequest) -> StorytimeResult<GenerateResponse>;

    /// Provider name (e.g., "openai", "groq").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-3.5-turbo").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<D> StoryDriver for Arc<D>
where
    D: StoryDriver + ?Sized,
{
    async fn generate(&self, req: &GenerateRequest) -> StorytimeResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
