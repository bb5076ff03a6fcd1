//! Configuration loading, validation, and management for Parley.
//!
//! Loads configuration from `~/.parley/config.toml` (or `$PARLEY_CONFIG`)
//! with environment variable overrides. Required values that are still
//! missing after loading are prompted for and written back to the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Names of the configuration keys that can be set interactively.
pub mod keys {
    /// API key of the remote completion service.
    pub const API_KEY: &str = "api_key";
}

/// Keys that must hold a non-blank value before the agent can start.
pub const REQUIRED_KEYS: &[&str] = &[keys::API_KEY];

/// Default number of reevaluation passes after the first task pass.
pub const DEFAULT_MAX_REEVALUATIONS: u32 = 3;

/// Base URL of a well-known OpenAI-compatible provider.
pub fn known_base_url(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        "deepseek" => Some("https://api.deepseek.com/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        "together" => Some("https://api.together.xyz/v1"),
        _ => None,
    }
}

/// The root configuration structure.
///
/// Maps directly to `~/.parley/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Completion provider name ("openai", "openrouter", "ollama", ...)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model used for direct replies
    #[serde(default = "default_model")]
    pub model: String,

    /// Max tokens per direct reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP timeout for completion requests
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// System prompt that opens every conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// User id attached to console messages
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Task pipeline settings
    #[serde(default)]
    pub task: TaskConfig,

    /// Console transport settings
    #[serde(default)]
    pub console: ConsoleConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_max_tokens() -> u32 {
    50
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_system_prompt() -> String {
    "You are a cute cat and will speak as such.".into()
}
fn default_user_id() -> String {
    "1234".into()
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("system_prompt", &self.system_prompt)
            .field("user_id", &self.user_id)
            .field("task", &self.task)
            .field("console", &self.console)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Reevaluation passes run after the first task pass
    #[serde(default = "default_max_reevaluations")]
    pub max_reevaluations: u32,

    /// End reevaluation once a pass yields the stop sentinel.
    /// Off by default: every pass runs regardless of content.
    #[serde(default)]
    pub stop_on_sentinel: bool,
}

fn default_max_reevaluations() -> u32 {
    DEFAULT_MAX_REEVALUATIONS
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            max_reevaluations: default_max_reevaluations(),
            stop_on_sentinel: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Lines arriving closer together than this are treated as one paste
    #[serde(default = "default_paste_window_ms")]
    pub paste_window_ms: u64,

    /// Prefix printed before every reply
    #[serde(default = "default_reply_prefix")]
    pub reply_prefix: String,
}

fn default_paste_window_ms() -> u64 {
    50
}
fn default_reply_prefix() -> String {
    "Bot: ".into()
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            paste_window_ms: default_paste_window_ms(),
            reply_prefix: default_reply_prefix(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path.
    ///
    /// Also checks environment variables:
    /// - `PARLEY_API_KEY`, then `OPENAI_API_KEY` (only when no key is configured)
    /// - `PARLEY_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        tracing::debug!("Reading configuration from {}", path.display());
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

    /// Load the config for an interactive session.
    ///
    /// Missing required keys are prompted for and persisted together with the
    /// file's own values. Environment overrides are applied only to the
    /// returned config, never to what is written to `path`. Returns the
    /// effective config and the keys that were filled in by the prompt.
    pub fn load_for_session<L, P>(
        path: &Path,
        lookup: L,
        prompt: P,
    ) -> Result<(Self, Vec<&'static str>), ConfigError>
    where
        L: Fn(&str) -> Option<String>,
        P: FnMut(&str) -> Option<String>,
    {
        let mut stored = Self::load_from(path)?;

        let mut effective = stored.clone();
        effective.apply_env_overrides(&lookup);

        let filled = if effective.missing_required_keys().is_empty() {
            if !path.exists() {
                stored.save_to(path)?;
            }
            Vec::new()
        } else {
            stored.ensure_required(path, prompt)?
        };

        stored.apply_env_overrides(lookup);
        Ok((stored, filled))
    }

    /// The base URL requests go to: `api_url`, else the provider's default.
    pub fn resolved_api_url(&self) -> Option<String> {
        self.api_url
            .clone()
            .or_else(|| known_base_url(&self.provider).map(str::to_string))
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.value_of(keys::API_KEY).is_none() {
            if let Some(key) = lookup("PARLEY_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
                self.api_key = Some(key);
            }
        }

        if let Some(model) = lookup("PARLEY_MODEL") {
            self.model = model;
        }
    }

    /// Path of the config file: `$PARLEY_CONFIG` or `~/.parley/config.toml`.
    pub fn config_path() -> PathBuf {
        std::env::var("PARLEY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_dir().join("config.toml"))
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".parley")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.task.max_reevaluations == 0 {
            return Err(ConfigError::ValidationError(
                "task.max_reevaluations must be at least 1".into(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be > 0".into(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be > 0".into(),
            ));
        }

        if self.resolved_api_url().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "unknown provider '{}': set api_url to its OpenAI-compatible endpoint",
                self.provider
            )));
        }

        if self.user_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "user_id must not be blank".into(),
            ));
        }

        Ok(())
    }

    /// The non-blank value of an interactively settable key.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        let value = match key {
            keys::API_KEY => self.api_key.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Set an interactively settable key.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<(), ConfigError> {
        match key {
            keys::API_KEY => {
                self.api_key = Some(value.into());
                Ok(())
            }
            other => Err(ConfigError::UnknownKey(other.to_string())),
        }
    }

    /// Required keys that are absent or blank.
    pub fn missing_required_keys(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| self.value_of(key).is_none())
            .collect()
    }

    /// Prompt for every missing required key and persist the result.
    ///
    /// `prompt` is called with the key name until it yields a non-blank
    /// value; `None` means the input ended and aborts the setup. The file at
    /// `path` is (re)written when a value was filled in or when it does not
    /// exist yet. Returns the keys that were filled in.
    pub fn ensure_required<F>(&mut self, path: &Path, mut prompt: F) -> Result<Vec<&'static str>, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let missing = self.missing_required_keys();
        if !missing.is_empty() {
            tracing::warn!(keys = ?missing, "Required configuration keys are missing");
        }

        for key in &missing {
            let value = loop {
                tracing::info!("Please enter the value for '{key}'");
                let Some(raw) = prompt(key) else {
                    return Err(ConfigError::PromptAborted(key.to_string()));
                };
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    tracing::warn!("Value cannot be empty. Please try again.");
                    continue;
                }
                break trimmed.to_string();
            };
            self.set_value(key, value)?;
        }

        if !missing.is_empty() || !path.exists() {
            self.save_to(path)?;
        }

        Ok(missing)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::info!("Writing configuration to {}", path.display());
        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            system_prompt: default_system_prompt(),
            user_id: default_user_id(),
            task: TaskConfig::default(),
            console: ConsoleConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Input ended before a value for '{0}' was entered")]
    PromptAborted(String),
}
