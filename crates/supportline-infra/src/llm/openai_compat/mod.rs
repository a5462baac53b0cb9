//! OpenAI-compatible LLM provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] serves OpenAI, Google Gemini, and
//! Mistral -- three providers from one codebase via configurable base URLs
//! and factory functions. Uses the same reqwest + secrecy pattern as the
//! Anthropic client; no client-level retries.

pub mod config;
pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use supportline_core::llm::provider::LlmProvider;
use supportline_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole};

use self::config::OpenAiCompatConfig;
use self::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessageBody};

/// Unified provider for any OpenAI-compatible chat completions API.
///
/// # API Key Security
///
/// Does NOT derive Debug; the API key lives in a [`SecretString`] and is
/// only exposed when building the Authorization header. Same
/// defense-in-depth pattern as [`super::anthropic::AnthropicProvider`].
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    provider_name: String,
    base_url: String,
    api_key: SecretString,
}

impl OpenAiCompatibleProvider {
    /// Create a new OpenAI-compatible provider from a configuration.
    pub fn new(config: OpenAiCompatConfig, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            provider_name: config.provider_name,
            base_url: config.base_url,
            api_key: config.api_key,
        }
    }

    /// Create an OpenAI provider (`https://api.openai.com/v1`).
    pub fn openai(api_key: SecretString, timeout: Duration) -> Self {
        Self::new(config::openai_defaults(api_key), timeout)
    }

    /// Create a Google Gemini provider (OpenAI-compatible beta endpoint).
    pub fn gemini(api_key: SecretString, timeout: Duration) -> Self {
        Self::new(config::gemini_defaults(api_key), timeout)
    }

    /// Create a Mistral AI provider (`https://api.mistral.ai/v1`).
    pub fn mistral(api_key: SecretString, timeout: Duration) -> Self {
        Self::new(config::mistral_defaults(api_key), timeout)
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build a [`ChatCompletionRequest`] from a generic [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        let mut messages = Vec::new();

        if let Some(system) = request.system.as_deref().filter(|s| !s.is_empty()) {
            messages.push(ChatMessageBody {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }

        for msg in &request.messages {
            let role = match msg.role {
                MessageRole::System => "system",
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            };
            messages.push(ChatMessageBody {
                role: role.to_string(),
                content: msg.content.clone(),
            });
        }

        ChatCompletionRequest {
            model: request.model.clone(),
            messages,
            max_tokens: Some(request.max_tokens),
            temperature: request.temperature,
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(request);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Provider {
                        message: format!("HTTP request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                503 => LlmError::Overloaded(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: completion.model.unwrap_or_else(|| request.model.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supportline_types::llm::Message;

    fn provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::gemini(SecretString::from("test-key"), Duration::from_secs(5))
    }

    #[test]
    fn test_factory_names_and_urls() {
        let timeout = Duration::from_secs(5);
        let key = || SecretString::from("k");
        assert_eq!(OpenAiCompatibleProvider::openai(key(), timeout).name(), "openai");
        assert_eq!(OpenAiCompatibleProvider::gemini(key(), timeout).name(), "gemini");
        assert_eq!(OpenAiCompatibleProvider::mistral(key(), timeout).name(), "mistral");

        let gemini = OpenAiCompatibleProvider::gemini(key(), timeout);
        assert!(gemini.base_url.contains("generativelanguage.googleapis.com"));

        let proxied = OpenAiCompatibleProvider::openai(key(), timeout)
            .with_base_url("http://localhost:9999/v1".to_string());
        assert_eq!(proxied.base_url, "http://localhost:9999/v1");
    }

    #[test]
    fn test_build_request_prepends_system() {
        let request = CompletionRequest {
            model: "gemini-2.5-flash".to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "Where is my order?".to_string(),
            }],
            system: Some("You are a support assistant.".to_string()),
            max_tokens: 1024,
            temperature: None,
        };
        let body = provider().build_request(&request);
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[1].role, "user");
        assert_eq!(body.max_tokens, Some(1024));
    }

    #[test]
    fn test_build_request_skips_empty_system() {
        let request = CompletionRequest {
            model: "gemini-2.5-flash".to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "Hi".to_string(),
            }],
            system: Some(String::new()),
            max_tokens: 256,
            temperature: None,
        };
        let body = provider().build_request(&request);
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].role, "user");
    }
}
