//! Runtime configuration.
//!
//! Loaded from YAML; every field has a default, so an empty file is valid.
//!
//! ```yaml
//! provider: anthropic
//! model: claude-sonnet-4-20250514
//! max_tokens: 4000
//! temperature: 0.0
//! timeout: 90s
//! base_url: https://api.anthropic.com/v1
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::providers::CompletionConfig;

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid duration '{value}' for {field}: {reason}")]
    InvalidDuration {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    provider: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout: Option<String>,
    base_url: Option<String>,
    api_key: Option<String>,
}

/// Settings for talking to the analysis generator.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Registered provider type (e.g. "anthropic")
    pub provider: String,

    pub completion: CompletionConfig,

    /// Overrides the provider's default endpoint
    pub base_url: Option<String>,

    /// Falls back to the provider's environment variable when unset
    pub api_key: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            completion: CompletionConfig::default(),
            base_url: None,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("provider", &self.provider)
            .field("completion", &self.completion)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl RuntimeConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document; treat it as all defaults
        let raw: RawConfig = if yaml.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        Self::from_raw(raw)
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(provider) = raw.provider {
            config.provider = provider;
        }
        if let Some(model) = raw.model {
            config.completion.model = model;
        }
        if let Some(max_tokens) = raw.max_tokens {
            if max_tokens == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "max_tokens",
                    reason: "must be positive".to_string(),
                });
            }
            config.completion.max_tokens = max_tokens;
        }
        if let Some(temperature) = raw.temperature {
            if !(0.0..=1.0).contains(&temperature) {
                return Err(ConfigError::InvalidValue {
                    field: "temperature",
                    reason: format!("{} is outside 0.0-1.0", temperature),
                });
            }
            config.completion.temperature = temperature;
        }
        if let Some(timeout) = raw.timeout {
            config.completion.timeout = parse_duration("timeout", &timeout)?;
        }
        config.base_url = raw.base_url;
        config.api_key = raw.api_key;

        Ok(config)
    }

    /// Completion settings to send with each request.
    pub fn completion_config(&self) -> CompletionConfig {
        self.completion.clone()
    }
}

fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
