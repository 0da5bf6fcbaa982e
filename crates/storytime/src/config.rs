//! Layered TOML configuration for the whole application.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from storytime.toml)
//! - `~/.config/storytime/storytime.toml`
//! - `./storytime.toml`
//! - An explicit `--config` path

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use storytime_error::{ConfigError, StorytimeError, StorytimeResult};
use storytime_interface::StoryDriver;
use storytime_models::ModelConfig;
use storytime_narrative::{JudgeValidator, SessionConfig, SessionController};
use storytime_rate_limit::{RetryConfig, RetryExecutor};
use storytime_security::{ContentFilter, SafetyConfig, SafetyValidator};
use tracing::{debug, info, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../storytime.toml");

/// Top-level Storytime configuration.
///
/// Every section is optional; missing sections and keys take their defaults.
///
/// # Example
///
/// ```no_run
/// use storytime::StorytimeConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StorytimeConfig::load(None)?;
/// println!("Using model {}", config.model.model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StorytimeConfig {
    /// Model endpoint settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Retry and pacing settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Content safety settings
    #[serde(default)]
    pub safety: SafetyConfig,

    /// Story session settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl StorytimeConfig {
    /// Load configuration with precedence: explicit path > current dir > home dir > bundled defaults.
    ///
    /// User config files in the home and current directory are optional. An
    /// explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a file cannot be parsed or a value is
    /// out of range.
    #[instrument(skip(explicit))]
    pub fn load(explicit: Option<&Path>) -> StorytimeResult<Self> {
        debug!("Loading configuration with precedence: explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storytime/storytime.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storytime").required(false));

        if let Some(path) = explicit {
            info!(path = %path.display(), "Using configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file on top of the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StorytimeResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.model.trim().is_empty() {
            return Err(ConfigError::new("[model] model must not be empty"));
        }
        if self.model.base_url.trim().is_empty() {
            return Err(ConfigError::new("[model] base_url must not be empty"));
        }
        if self.model.request_timeout_secs == 0 {
            return Err(ConfigError::new(
                "[model] request_timeout_secs must be greater than zero",
            ));
        }
        self.retry.validate()?;
        self.safety.validate()?;
        if self.session.max_narrative_chars == 0 {
            return Err(ConfigError::new(
                "[session] max_narrative_chars must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Replace the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model.model = model.into();
        self
    }

    /// Replace the retry attempt limit.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.retry = self.retry.with_max_attempts(max_attempts);
        self
    }

    /// Assemble a session around a driver.
    ///
    /// The validator is the rule-based content filter, wrapped in the model
    /// judge when `[safety] judge` is enabled.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a prohibited pattern does not compile.
    pub fn build_session(&self, driver: Arc<dyn StoryDriver>) -> StorytimeResult<SessionController> {
        let executor = Arc::new(RetryExecutor::new(driver, self.retry.clone()));
        let filter = ContentFilter::new(self.safety.filter.clone())
            .map_err(|e| StorytimeError::from(ConfigError::from(e)))?;

        let validator: Box<dyn SafetyValidator> = if self.safety.judge {
            debug!(min_quality = self.safety.min_quality, "Using model judge");
            Box::new(JudgeValidator::new(
                filter,
                executor.clone(),
                self.safety.min_quality,
            ))
        } else {
            Box::new(filter)
        };

        Ok(SessionController::new(
            executor,
            validator,
            self.session.clone(),
        ))
    }
}
