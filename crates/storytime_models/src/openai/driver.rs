//! OpenAI chat completions driver.

use crate::ModelConfig;
use crate::openai::{OpenAICompatError, OpenAICompatibleClient};
use async_trait::async_trait;
use storytime_core::{GenerateRequest, GenerateResponse};
use storytime_error::{ConfigError, ModelError, StorytimeResult};
use storytime_interface::StoryDriver;
use tracing::instrument;

/// Driver for OpenAI and any endpoint that mimics it.
#[derive(Debug, Clone)]
pub struct OpenAIDriver {
    inner: OpenAICompatibleClient,
}

impl OpenAIDriver {
    /// Creates a driver reading the API key from the variable named in the config.
    ///
    /// Call `dotenvy::dotenv()` first if the key lives in a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is missing or blank.
    #[instrument(skip_all, fields(model = %config.model, key_var = %config.api_key_env))]
    pub fn from_env(config: &ModelConfig) -> StorytimeResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::new(format!("{} not set", config.api_key_env)))?;

        Self::with_api_key(api_key, config)
    }

    /// Creates a driver with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be initialized.
    #[instrument(skip(api_key, config), fields(model = %config.model))]
    pub fn with_api_key(api_key: String, config: &ModelConfig) -> StorytimeResult<Self> {
        let inner = OpenAICompatibleClient::new(
            api_key,
            config.model.clone(),
            config.base_url.clone(),
            "openai",
            config.request_timeout(),
        )
        .map_err(|e| ConfigError::new(e.to_string()))?;

        Ok(Self { inner })
    }

    fn convert_error(error: OpenAICompatError) -> ModelError {
        ModelError::new(error.classify())
    }
}

#[async_trait]
impl StoryDriver for OpenAIDriver {
    #[instrument(skip(self, req), fields(provider = "openai", model = %self.inner.model_name()))]
    async fn generate(&self, req: &GenerateRequest) -> StorytimeResult<GenerateResponse> {
        self.inner
            .generate(req)
            .await
            .map_err(|e| Self::convert_error(e).into())
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
