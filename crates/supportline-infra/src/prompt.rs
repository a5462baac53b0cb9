//! Prompt library loader.
//!
//! Reads `*.md` files from `{data_dir}/prompts/` over the built-in
//! templates; the file stem becomes the template reference. A missing
//! directory is fine -- the built-ins alone then back the registry.

use std::path::Path;

use supportline_core::prompt::PromptLibrary;

/// Load the prompt library: built-in templates, overridden and extended by
/// any `*.md` files in `dir`.
pub async fn load_prompt_library(dir: &Path) -> PromptLibrary {
    let mut library = PromptLibrary::builtin();

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(_) => {
            tracing::debug!("No prompt directory at {}, using built-in templates", dir.display());
            return library;
        }
    };

    let mut loaded = 0usize;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                library.set(stem, content);
                loaded += 1;
            }
            Err(err) => {
                tracing::warn!("Failed to read prompt template {}: {err}", path.display());
            }
        }
    }

    tracing::info!(loaded, "Prompt templates loaded from {}", dir.display());
    library
}
