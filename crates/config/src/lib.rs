//! Configuration loading, validation, and management for Notewire.
//!
//! Loads an optional `notewire.toml` (path overridable with
//! `NOTEWIRE_CONFIG`) and then applies environment variable overrides.
//! Credentials normally arrive only through the environment:
//!
//! - `TELEGRAM_BOT_TOKEN`: delivery bot token
//! - `YC_API_KEY`: completion service API key
//! - `YC_FOLDER_ID`: completion service folder used for model routing
//!
//! Every credential is optional. A missing one disables the path that needs
//! it; it never prevents the handler from starting.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "NOTEWIRE_CONFIG";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_API_KEY: &str = "YC_API_KEY";
pub const ENV_FOLDER_ID: &str = "YC_FOLDER_ID";
pub const ENV_TELEGRAM_API_BASE: &str = "NOTEWIRE_TELEGRAM_API_BASE";
pub const ENV_LLM_ENDPOINT: &str = "NOTEWIRE_LLM_ENDPOINT";
pub const ENV_MODEL: &str = "NOTEWIRE_MODEL";

/// The root configuration structure.
///
/// Maps directly to `notewire.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Outbound delivery settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Completion service settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// HTTP server settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

/// Treat empty strings as absent, the way an unset variable would be.
fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|v| !v.is_empty())
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".into()
}
fn default_timeout_secs() -> u64 {
    20
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: default_telegram_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &redact(&self.bot_token))
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,

    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Model path inside the folder, e.g. `yandexgpt-lite/latest`
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_endpoint() -> String {
    "https://llm.api.cloud.yandex.net/foundationModels/v1/completion".into()
}
fn default_model() -> String {
    "yandexgpt-lite/latest".into()
}
fn default_max_tokens() -> u32 {
    800
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            folder_id: None,
            endpoint: default_llm_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &redact(&self.api_key))
            .field("folder_id", &self.folder_id)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Both values the completion service needs, borrowed from the config.
#[derive(Debug, Clone, Copy)]
pub struct LlmCredentials<'a> {
    pub api_key: &'a str,
    pub folder_id: &'a str,
}

impl AppConfig {
    /// Load configuration from `$NOTEWIRE_CONFIG` (default `notewire.toml`)
    /// and apply process environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("notewire.toml"));

        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Set, non-empty variables win over file values.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(token) = get(ENV_TELEGRAM_TOKEN) {
            self.telegram.bot_token = Some(token);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.llm.api_key = Some(key);
        }
        if let Some(folder) = get(ENV_FOLDER_ID) {
            self.llm.folder_id = Some(folder);
        }
        if let Some(base) = get(ENV_TELEGRAM_API_BASE) {
            self.telegram.api_base = base;
        }
        if let Some(endpoint) = get(ENV_LLM_ENDPOINT) {
            self.llm.endpoint = endpoint;
        }
        if let Some(model) = get(ENV_MODEL) {
            self.llm.model = model;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "llm.max_tokens must be greater than 0".into(),
            ));
        }

        if self.llm.timeout_secs == 0 || self.telegram.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than 0".into(),
            ));
        }

        if self.llm.endpoint.trim().is_empty() || self.telegram.api_base.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.endpoint and telegram.api_base must not be empty".into(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// The delivery bot token, if configured.
    pub fn telegram_token(&self) -> Option<&str> {
        non_empty(&self.telegram.bot_token)
    }

    /// Completion service credentials, if both are configured.
    pub fn llm_credentials(&self) -> Option<LlmCredentials<'_>> {
        Some(LlmCredentials {
            api_key: non_empty(&self.llm.api_key)?,
            folder_id: non_empty(&self.llm.folder_id)?,
        })
    }

    /// Names of the required environment variables that are not set.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.telegram_token().is_none() {
            missing.push(ENV_TELEGRAM_TOKEN);
        }
        if non_empty(&self.llm.api_key).is_none() {
            missing.push(ENV_API_KEY);
        }
        if non_empty(&self.llm.folder_id).is_none() {
            missing.push(ENV_FOLDER_ID);
        }
        missing
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
