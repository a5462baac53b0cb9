//! Application configuration types for Supportline.
//!
//! [`AppConfig`] represents the top-level `config.toml`: server bind
//! address, LLM client settings, and the AI configuration profile table.
//! The profile table maps a configuration key (stored per session) to a
//! provider, model, and system-prompt template. It is loaded once at
//! process start and immutable thereafter.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration key every deployment must define; used as the fallback
/// when a session references an unknown key, and for title generation.
pub const DEFAULT_PROFILE_KEY: &str = "default";

/// One selectable AI setup: which provider/model answers, and which
/// system-prompt template frames the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiProfile {
    /// User-facing display name for the profile dropdown.
    pub name: String,
    /// Provider name resolved against the provider registry
    /// (e.g., "anthropic", "gemini", "openai").
    pub provider: String,
    /// Model identifier passed to the provider.
    pub model: String,
    /// Template reference resolved against the prompt library.
    pub system_prompt: String,
}

/// The static table of AI configuration profiles, keyed by configuration key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AiConfigurations {
    pub profiles: HashMap<String, AiProfile>,
}

impl AiConfigurations {
    /// Look up a profile by configuration key.
    pub fn get(&self, key: &str) -> Option<&AiProfile> {
        self.profiles.get(key)
    }

    /// The mandatory `default` profile, if the deployment defines one.
    pub fn default_profile(&self) -> Option<&AiProfile> {
        self.profiles.get(DEFAULT_PROFILE_KEY)
    }

    /// Whether the given configuration key is defined.
    pub fn contains_key(&self, key: &str) -> bool {
        self.profiles.contains_key(key)
    }

    /// (key, display name) pairs for the session-creation dropdown,
    /// sorted by key for a stable order.
    pub fn display_names(&self) -> Vec<(String, String)> {
        let mut names: Vec<(String, String)> = self
            .profiles
            .iter()
            .map(|(key, profile)| (key.clone(), profile.name.clone()))
            .collect();
        names.sort();
        names
    }

    /// Distinct provider names referenced by any profile.
    pub fn provider_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .profiles
            .values()
            .map(|p| p.provider.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl Default for AiConfigurations {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            DEFAULT_PROFILE_KEY.to_string(),
            AiProfile {
                name: "Standard (Gemini Flash)".to_string(),
                provider: "gemini".to_string(),
                model: "gemini-2.5-flash".to_string(),
                system_prompt: "support".to_string(),
            },
        );
        profiles.insert(
            "gemini-pro".to_string(),
            AiProfile {
                name: "Advanced (Gemini Pro)".to_string(),
                provider: "gemini".to_string(),
                model: "gemini-2.5-pro".to_string(),
                system_prompt: "support".to_string(),
            },
        );
        profiles.insert(
            "alternative-prompt".to_string(),
            AiProfile {
                name: "Experimental Prompt (Gemini Flash)".to_string(),
                provider: "gemini".to_string(),
                model: "gemini-2.5-flash".to_string(),
                system_prompt: "support-experimental".to_string(),
            },
        );
        Self { profiles }
    }
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// LLM client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Upper bound on a single provider round-trip, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Top-level configuration, loaded from `{data_dir}/config.toml`.
/// All sections have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub profiles: AiConfigurations,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles_include_default_key() {
        let configs = AiConfigurations::default();
        assert!(configs.default_profile().is_some());
        assert_eq!(configs.profiles.len(), 3);
        assert_eq!(configs.default_profile().unwrap().provider, "gemini");
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.llm.request_timeout_secs, 60);
        assert!(config.profiles.contains_key(DEFAULT_PROFILE_KEY));
    }

    #[test]
    fn test_app_config_deserialize_with_values() {
        let toml_str = r#"
[server]
host = "0.0.0.0"
port = 9000

[llm]
request_timeout_secs = 30

[profiles.default]
name = "Claude"
provider = "anthropic"
model = "claude-sonnet-4-20250514"
system_prompt = "support"

[profiles.concise]
name = "Concise"
provider = "anthropic"
model = "claude-haiku-4-20250514"
system_prompt = "support-experimental"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.request_timeout_secs, 30);
        assert_eq!(config.profiles.profiles.len(), 2);
        assert_eq!(
            config.profiles.get("concise").unwrap().model,
            "claude-haiku-4-20250514"
        );
    }

    #[test]
    fn test_explicit_profiles_replace_defaults() {
        // A config that defines profiles but omits `default` keeps that
        // omission; the missing default is surfaced at dispatch time.
        let toml_str = r#"
[profiles.only-one]
name = "Only one"
provider = "openai"
model = "gpt-4o"
system_prompt = "support"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!(config.profiles.default_profile().is_none());
        assert!(config.profiles.contains_key("only-one"));
    }

    #[test]
    fn test_display_names_sorted() {
        let configs = AiConfigurations::default();
        let names = configs.display_names();
        let keys: Vec<&str> = names.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["alternative-prompt", "default", "gemini-pro"]);
    }

    #[test]
    fn test_provider_names_deduped() {
        let configs = AiConfigurations::default();
        assert_eq!(configs.provider_names(), vec!["gemini".to_string()]);
    }

    #[test]
    fn test_app_config_serde_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.profiles.profiles.len(), config.profiles.profiles.len());
    }
}
