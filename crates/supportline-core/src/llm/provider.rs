//! LlmProvider trait definition.
//!
//! The single abstraction the orchestrator dispatches through. Uses native
//! async fn in traits (RPITIT, Rust 2024 edition); implementations live in
//! supportline-infra.

use supportline_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (Anthropic, Gemini, OpenAI, ...).
///
/// A provider is an opaque text-completion function: one request in, one
/// response out. Providers must not retry failed calls internally; failure
/// handling is the caller's concern.
pub trait LlmProvider: Send + Sync {
    /// Provider name as referenced by configuration profiles
    /// (e.g., "anthropic", "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
