//! Application configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.supportline/` by
//! default) and deserializes it into [`AppConfig`]. Falls back to sensible
//! defaults when the file is missing or malformed. Provider API keys are
//! never stored in the file; they come from the environment.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use supportline_types::config::AppConfig;

/// Resolve the data directory.
///
/// `SUPPORTLINE_DATA_DIR` wins when set; otherwise `~/.supportline`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SUPPORTLINE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".supportline")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - Otherwise returns the parsed config.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Environment variable holding the API key for a provider
/// (e.g., "gemini" -> `GEMINI_API_KEY`).
pub fn provider_key_env_var(provider: &str) -> String {
    format!(
        "{}_API_KEY",
        provider.to_uppercase().replace('-', "_")
    )
}

/// Resolve a provider's API key from the environment.
pub fn provider_api_key(provider: &str) -> Option<SecretString> {
    std::env::var(provider_key_env_var(provider))
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_app_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.server.port, 8787);
        assert!(config.profiles.default_profile().is_some());
    }

    #[tokio::test]
    async fn load_app_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
port = 9100

[llm]
request_timeout_secs = 15

[profiles.default]
name = "Claude"
provider = "anthropic"
model = "claude-sonnet-4-20250514"
system_prompt = "support"
"#,
        )
        .await
        .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.llm.request_timeout_secs, 15);
        assert_eq!(config.profiles.default_profile().unwrap().provider, "anthropic");
    }

    #[tokio::test]
    async fn load_app_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.server.port, 8787);
    }

    #[test]
    fn provider_key_env_var_uppercases_and_rewrites_dashes() {
        assert_eq!(provider_key_env_var("gemini"), "GEMINI_API_KEY");
        assert_eq!(provider_key_env_var("my-proxy"), "MY_PROXY_API_KEY");
    }
}
