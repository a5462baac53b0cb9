//! Session title generation via LLM.
//!
//! `generate_title` produces a short, human-readable title for a chat
//! session from its first user message. Always dispatched through the
//! default configuration profile, not the session's own.

use supportline_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

use crate::llm::box_provider::BoxLlmProvider;

/// Generate a session title from the first user message.
///
/// Uses a single low-temperature LLM call with a strict prompt. The result
/// is trimmed of whitespace and surrounding quotes; the caller truncates
/// and decides whether to store it.
#[tracing::instrument(name = "generate_title", skip(provider, first_user_message), fields(model = %model))]
pub async fn generate_title(
    provider: &BoxLlmProvider,
    model: &str,
    first_user_message: &str,
) -> Result<String, LlmError> {
    let prompt = format!(
        "Generate a very short title (max 5 words) for a chat based on this first user message: \"{first_user_message}\""
    );

    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message {
            role: MessageRole::User,
            content: prompt,
        }],
        system: None,
        max_tokens: 50,
        temperature: Some(0.3),
    };

    let response = provider.complete(&request).await?;

    let title = response
        .content
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .to_string();

    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::LlmProvider;
    use supportline_types::llm::CompletionResponse;

    struct CannedProvider(&'static str);

    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                content: self.0.to_string(),
                model: request.model.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_title_strips_quotes_and_whitespace() {
        let provider = BoxLlmProvider::new(CannedProvider("  \"Password Reset Help\"  "));
        let title = generate_title(&provider, "gemini-2.5-flash", "I forgot my password")
            .await
            .unwrap();
        assert_eq!(title, "Password Reset Help");
    }

    #[tokio::test]
    async fn test_title_strips_single_quotes() {
        let provider = BoxLlmProvider::new(CannedProvider("'Refund Request'"));
        let title = generate_title(&provider, "gemini-2.5-flash", "I want a refund")
            .await
            .unwrap();
        assert_eq!(title, "Refund Request");
    }

    #[tokio::test]
    async fn test_title_request_includes_first_message() {
        struct AssertingProvider;

        impl LlmProvider for AssertingProvider {
            fn name(&self) -> &str {
                "asserting"
            }

            async fn complete(
                &self,
                request: &CompletionRequest,
            ) -> Result<CompletionResponse, LlmError> {
                let prompt = &request.messages[0].content;
                assert!(prompt.contains("max 5 words"));
                assert!(prompt.contains("my order never arrived"));
                assert_eq!(request.max_tokens, 50);
                Ok(CompletionResponse {
                    content: "Missing Order".to_string(),
                    model: request.model.clone(),
                })
            }
        }

        let provider = BoxLlmProvider::new(AssertingProvider);
        let title = generate_title(&provider, "gemini-2.5-flash", "my order never arrived")
            .await
            .unwrap();
        assert_eq!(title, "Missing Order");
    }
}
