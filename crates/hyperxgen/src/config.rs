//! Configuration types.
//!
//! [`KernelConfig`] is the per-request record (model and sampling) the
//! kernel reads but never mutates. [`Settings`] is what the CLI loads from a
//! JSON file: a `KernelConfig` plus the text model and retry budget.
//!
//! ```
//! use hyperxgen::config::KernelConfig;
//!
//! let config = KernelConfig::default()
//!     .with_temperature(0.2)
//!     .with_thinking_budget(1024);
//! assert_eq!(config.thinking_budget, 1024);
//! ```
//!
//! The JSON keys are camelCase (`thinkingBudget`, `deviceContext`) and every
//! field is optional:
//!
//! ```json
//! { "model": "gemini-2.5-flash-image", "temperature": 0.3, "maxRetries": 3 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::api::retry::{MAX_RETRY_BUDGET, RetryConfig};
use crate::error::KernelError;
use crate::{DEFAULT_MODEL, DEFAULT_TEXT_MODEL, GenerationConfig, ThinkingConfig};

/// Model and sampling parameters supplied with each request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct KernelConfig {
    /// Reasoning token budget. `0` disables thinking.
    pub thinking_budget: u32,
    pub temperature: f32,
    /// Image-capable model used for synthesis and composition refinement.
    pub model: String,
    /// Free-form label describing the calling device; logged only.
    pub device_context: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            thinking_budget: 0,
            temperature: 0.4,
            model: DEFAULT_MODEL.to_string(),
            device_context: "MAXIMUM_ARCHITECTURE_OMEGA_V5".to_string(),
        }
    }
}

impl KernelConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = budget;
        self
    }

    pub fn with_device_context(mut self, context: impl Into<String>) -> Self {
        self.device_context = context.into();
        self
    }

    /// Generation config for a request at `temperature`.
    ///
    /// The thinking budget is only sent when non-zero.
    pub(crate) fn generation_config(&self, temperature: f32) -> GenerationConfig {
        GenerationConfig {
            temperature: Some(temperature),
            thinking_config: (self.thinking_budget > 0).then_some(ThinkingConfig {
                thinking_budget: self.thinking_budget,
            }),
            ..Default::default()
        }
    }

    /// Reject values the remote API would refuse anyway.
    pub fn validate(&self) -> Result<(), KernelError> {
        if self.model.trim().is_empty() {
            return Err(KernelError::Config("model must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(KernelError::Config(format!(
                "temperature {} outside 0.0..=2.0",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Everything the CLI reads from a config file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(flatten)]
    pub kernel: KernelConfig,
    /// Text model for extraction and prompt refinement.
    pub text_model: String,
    /// Quota retries per request.
    pub max_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kernel: KernelConfig::default(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            max_retries: RetryConfig::default().max_retries,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, KernelError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KernelError::Config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        let settings: Settings = serde_json::from_str(&content).map_err(|e| {
            KernelError::Config(format!("failed to parse config '{}': {e}", path.display()))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the kernel config and bound the retry budget.
    pub fn validate(&self) -> Result<(), KernelError> {
        self.kernel.validate()?;
        if self.max_retries > MAX_RETRY_BUDGET {
            return Err(KernelError::Config(format!(
                "maxRetries {} exceeds the limit of {MAX_RETRY_BUDGET}",
                self.max_retries
            )));
        }
        Ok(())
    }

    /// Load from `path` when given, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, KernelError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::with_retries(self.max_retries)
    }
}
