//! Provider construction — builds the configured LLM backend.
//!
//! Every supported backend speaks the OpenAI chat-completions dialect, so
//! selection reduces to picking a base URL and wiring in the key and timeout.

use std::sync::Arc;
use webscout_config::AppConfig;
use webscout_core::provider::Provider;
use crate::openai_compat::OpenAiCompatProvider;

/// Build the provider described by `config`.
///
/// The API key is passed through as-is; when it is absent the first
/// completion fails with `ProviderError::NotConfigured`.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    let api_key = match config.provider.as_str() {
        // Local servers accept any bearer token
        "ollama" | "vllm" | "llamacpp" | "llama.cpp" => {
            Some(config.api_key.clone().unwrap_or_else(|| config.provider.clone()))
        }
        _ => config.api_key.clone(),
    };

    Arc::new(
        OpenAiCompatProvider::new(&config.provider, base_url, api_key)
            .with_timeout(config.llm.timeout_secs),
    )
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => "https://api.openai.com/v1".into(),
    }
}
