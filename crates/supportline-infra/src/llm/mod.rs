//! LLM provider implementations.
//!
//! Concrete implementations of the [`LlmProvider`] trait defined in
//! `supportline-core`, plus a factory ([`create_provider`]) and a registry
//! builder ([`build_provider_registry`]) that wires every provider the
//! configuration profiles reference, resolving API keys from the
//! environment.

pub mod anthropic;
pub mod openai_compat;

use std::time::Duration;

use secrecy::SecretString;

use supportline_core::llm::box_provider::BoxLlmProvider;
use supportline_core::llm::registry::ProviderRegistry;
use supportline_types::config::AppConfig;

use crate::config::{provider_api_key, provider_key_env_var};

use self::anthropic::AnthropicProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] for a provider name.
///
/// "anthropic" gets the native Messages API client; everything else goes
/// through the OpenAI-compatible client, with known names ("gemini",
/// "openai", "mistral") mapped to their base URLs.
pub fn create_provider(
    name: &str,
    api_key: SecretString,
    timeout: Duration,
) -> BoxLlmProvider {
    match name {
        "anthropic" => BoxLlmProvider::new(AnthropicProvider::new(api_key, timeout)),
        "gemini" => BoxLlmProvider::new(OpenAiCompatibleProvider::gemini(api_key, timeout)),
        "mistral" => BoxLlmProvider::new(OpenAiCompatibleProvider::mistral(api_key, timeout)),
        _ => BoxLlmProvider::new(OpenAiCompatibleProvider::openai(api_key, timeout)),
    }
}

/// Build the provider registry for every provider referenced by a
/// configuration profile.
///
/// Providers whose API key is absent from the environment are skipped with
/// a warning; dispatching to them later surfaces as an upstream failure,
/// not a crash.
pub fn build_provider_registry(config: &AppConfig) -> ProviderRegistry {
    let timeout = Duration::from_secs(config.llm.request_timeout_secs);
    let mut registry = ProviderRegistry::new();

    for name in config.profiles.provider_names() {
        match provider_api_key(&name) {
            Some(key) => {
                registry.register(name.clone(), create_provider(&name, key, timeout));
                tracing::info!(provider = %name, "LLM provider registered");
            }
            None => {
                tracing::warn!(
                    provider = %name,
                    env_var = %provider_key_env_var(&name),
                    "No API key in environment, provider not registered"
                );
            }
        }
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_names() {
        let timeout = Duration::from_secs(5);
        for name in ["anthropic", "gemini", "mistral", "openai"] {
            let provider = create_provider(name, SecretString::from("test-key"), timeout);
            assert_eq!(provider.name(), name);
        }
    }

    #[test]
    fn test_unknown_provider_falls_back_to_openai_client() {
        let provider = create_provider(
            "someone-else",
            SecretString::from("test-key"),
            Duration::from_secs(5),
        );
        // The OpenAI-compatible client reports its configured name.
        assert_eq!(provider.name(), "openai");
    }
}
