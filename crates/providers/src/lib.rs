//! Reasoning provider implementations for Roundtable.
//!
//! Two backends cover every deployment:
//! - [`ScriptedProvider`] — deterministic, in-process; the offline default
//!   and the test workhorse.
//! - [`OpenAiCompatProvider`] — any OpenAI-compatible `/chat/completions`
//!   endpoint (OpenRouter, OpenAI, Ollama, vLLM, ...), prompted to return a
//!   strict JSON step result.

pub mod openai_compat;
pub mod scripted;

pub use openai_compat::OpenAiCompatProvider;
pub use scripted::ScriptedProvider;

use std::sync::Arc;

use roundtable_config::AppConfig;
use roundtable_core::error::ProviderError;
use roundtable_core::provider::ReasoningProvider;

/// Build the configured reasoning provider.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn ReasoningProvider>, ProviderError> {
    let provider = &config.provider;
    match provider.kind.as_str() {
        "scripted" => Ok(Arc::new(ScriptedProvider::generated())),
        "openrouter" => {
            let key = require_key(provider, "openrouter")?;
            Ok(Arc::new(OpenAiCompatProvider::openrouter(key, &provider.model)))
        }
        "openai" => {
            let key = require_key(provider, "openai")?;
            Ok(Arc::new(OpenAiCompatProvider::openai(key, &provider.model)))
        }
        "ollama" => Ok(Arc::new(OpenAiCompatProvider::ollama(
            provider.api_url.as_deref(),
            &provider.model,
        ))),
        "custom" => {
            let url = provider.api_url.as_deref().ok_or_else(|| {
                ProviderError::NotConfigured("provider kind 'custom' requires api_url".into())
            })?;
            Ok(Arc::new(OpenAiCompatProvider::new(
                "custom",
                url,
                provider.api_key.clone().unwrap_or_default(),
                &provider.model,
            )))
        }
        other => Err(ProviderError::NotConfigured(format!(
            "unknown provider kind '{other}'"
        ))),
    }
}

fn require_key(
    provider: &roundtable_config::ProviderConfig,
    kind: &str,
) -> Result<String, ProviderError> {
    provider.api_key.clone().ok_or_else(|| {
        ProviderError::NotConfigured(format!("provider '{kind}' requires an API key"))
    })
}
