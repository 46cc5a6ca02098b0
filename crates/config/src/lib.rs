//! Configuration loading, validation, and management for Roundtable.
//!
//! Loads configuration from `~/.roundtable/config.toml` with environment
//! variable overrides. Validates all settings at load time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The root configuration structure.
///
/// Maps directly to `~/.roundtable/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Reasoning provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Orchestration loop settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Optional location context forwarded to the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            location: None,
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("orchestrator", &self.orchestrator)
            .field("location", &self.location)
            .finish()
    }
}

/// Settings for the reasoning provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which provider to use: "scripted", "openrouter", "openai", "ollama",
    /// or "custom" (requires `api_url`)
    #[serde(default = "default_provider_kind")]
    pub kind: String,

    /// API key (environment variables take precedence)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL override for custom / self-hosted endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model to request from HTTP providers
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_provider_kind() -> String {
    "scripted".into()
}
fn default_model() -> String {
    "anthropic/claude-sonnet-4".into()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            api_key: None,
            api_url: None,
            model: default_model(),
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Settings for the orchestration loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum rounds before the run is declared exhausted
    #[serde(default = "default_round_budget")]
    pub round_budget: u32,

    /// Critic confidence at which the run converges
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Simulated tool latency in milliseconds
    #[serde(default = "default_tool_latency_ms")]
    pub tool_latency_ms: u64,

    /// Timeout for each provider call in seconds
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
}

fn default_round_budget() -> u32 {
    3
}
fn default_confidence_threshold() -> f32 {
    0.8
}
fn default_tool_latency_ms() -> u64 {
    800
}
fn default_provider_timeout_secs() -> u64 {
    30
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            round_budget: default_round_budget(),
            confidence_threshold: default_confidence_threshold(),
            tool_latency_ms: default_tool_latency_ms(),
            provider_timeout_secs: default_provider_timeout_secs(),
        }
    }
}

/// Static location context.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl AppConfig {
    /// The configuration directory (`~/.roundtable`).
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".roundtable")
    }

    /// Load configuration: file (if present) → env overrides → validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_dir().join("config.toml");
        let mut config = if path.is_file() {
            Self::from_file(&path)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&text)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Precedence for the API key: `ROUNDTABLE_API_KEY`, then
    /// `OPENROUTER_API_KEY`, then `OPENAI_API_KEY`, then the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(kind) = std::env::var("ROUNDTABLE_PROVIDER") {
            if !kind.is_empty() {
                self.provider.kind = kind;
            }
        }
        for var in ["ROUNDTABLE_API_KEY", "OPENROUTER_API_KEY", "OPENAI_API_KEY"] {
            if let Ok(key) = std::env::var(var) {
                if !key.is_empty() {
                    self.provider.api_key = Some(key);
                    break;
                }
            }
        }
        if let Ok(model) = std::env::var("ROUNDTABLE_MODEL") {
            if !model.is_empty() {
                self.provider.model = model;
            }
        }
    }

    /// Validate settings. Called by `load()`; call directly after manual
    /// construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.orchestrator.round_budget == 0 {
            return Err(ConfigError::Invalid("round_budget must be at least 1".into()));
        }
        let threshold = self.orchestrator.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "confidence_threshold must be in [0, 1], got {threshold}"
            )));
        }
        match self.provider.kind.as_str() {
            "scripted" | "openrouter" | "openai" | "ollama" => {}
            "custom" => {
                if self.provider.api_url.is_none() {
                    return Err(ConfigError::Invalid(
                        "provider kind 'custom' requires api_url".into(),
                    ));
                }
            }
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown provider kind '{other}'"
                )));
            }
        }
        if let Some(loc) = &self.location {
            if !(-90.0..=90.0).contains(&loc.latitude)
                || !(-180.0..=180.0).contains(&loc.longitude)
            {
                return Err(ConfigError::Invalid(format!(
                    "location out of range: {}, {}",
                    loc.latitude, loc.longitude
                )));
            }
        }
        Ok(())
    }
}

fn dirs_home() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
