//! Provider registry for runtime provider lookup.
//!
//! A simple name-indexed registry of boxed LLM providers. Built once at
//! startup from configuration and read-only afterwards, so it is safe to
//! share across request handlers without synchronization.

use std::collections::HashMap;

use super::box_provider::BoxLlmProvider;

/// Registry of available LLM providers, indexed by name.
pub struct ProviderRegistry {
    providers: HashMap<String, BoxLlmProvider>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider under the given name.
    ///
    /// If a provider with this name already exists, it is replaced.
    pub fn register(&mut self, name: impl Into<String>, provider: BoxLlmProvider) {
        self.providers.insert(name.into(), provider);
    }

    /// Look up a provider by name.
    pub fn get(&self, name: &str) -> Option<&BoxLlmProvider> {
        self.providers.get(name)
    }

    /// List all registered provider names.
    pub fn list_names(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::LlmProvider;
    use supportline_types::llm::{CompletionRequest, CompletionResponse, LlmError};

    struct StaticProvider(&'static str);

    impl LlmProvider for StaticProvider {
        fn name(&self) -> &str {
            self.0
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                content: "ok".to_string(),
                model: "static".to_string(),
            })
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.get("anthropic").is_none());
        assert!(registry.list_names().is_empty());
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ProviderRegistry::new();
        registry.register("gemini", BoxLlmProvider::new(StaticProvider("gemini")));
        assert!(registry.get("gemini").is_some());
        assert!(registry.get("openai").is_none());
        assert_eq!(registry.list_names(), vec!["gemini"]);
    }
}
