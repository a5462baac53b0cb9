//! Chat orchestrator: session lifecycle, ownership checks, and the
//! message-exchange workflow.
//!
//! `ChatService` is generic over [`ChatRepository`] so the core crate never
//! depends on the storage layer. The AI configuration table, prompt
//! library, and provider registry are injected at construction and
//! read-only afterwards.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use supportline_types::chat::{ChatMessage, ChatSession, HistoryEntry, Sender};
use supportline_types::config::{AiConfigurations, AiProfile, DEFAULT_PROFILE_KEY};
use supportline_types::error::ChatError;
use supportline_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

use crate::chat::repository::ChatRepository;
use crate::chat::title::generate_title;
use crate::llm::registry::ProviderRegistry;
use crate::prompt::PromptLibrary;

/// Stored as the AI turn when the provider call fails, so the conversation
/// log stays consistent (exactly one AI turn per user turn).
pub const ERROR_REPLY: &str = "[Error fetching response]";

/// Maximum user message length, in characters.
pub const MAX_MESSAGE_LEN: usize = 1000;

/// Maximum session title length, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Output token cap for support replies.
const REPLY_MAX_TOKENS: u32 = 1024;

/// Result of a successful (or sentinel-recovered) message exchange.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub reply: String,
    pub ai_message_id: Uuid,
    pub session_title: Option<String>,
}

/// Orchestrates the chat workflow: ownership validation, message-turn
/// persistence, AI dispatch with configuration fallback, and lazy title
/// generation.
pub struct ChatService<C: ChatRepository> {
    repo: C,
    configurations: Arc<AiConfigurations>,
    prompts: Arc<PromptLibrary>,
    providers: Arc<ProviderRegistry>,
}

impl<C: ChatRepository> ChatService<C> {
    /// Create a new chat service.
    pub fn new(
        repo: C,
        configurations: Arc<AiConfigurations>,
        prompts: Arc<PromptLibrary>,
        providers: Arc<ProviderRegistry>,
    ) -> Self {
        Self {
            repo,
            configurations,
            prompts,
            providers,
        }
    }

    /// Access the chat repository.
    pub fn repo(&self) -> &C {
        &self.repo
    }

    /// The configuration profiles available to new sessions.
    pub fn configurations(&self) -> &AiConfigurations {
        &self.configurations
    }

    // --- Session access control ---

    /// Fetch a session and verify the caller owns it.
    ///
    /// Every session-scoped operation goes through here.
    pub async fn session_for_user(
        &self,
        user_id: &Uuid,
        session_id: &Uuid,
    ) -> Result<ChatSession, ChatError> {
        let session = self
            .repo
            .get_session(session_id)
            .await?
            .ok_or(ChatError::NotFound)?;
        if session.user_id != *user_id {
            return Err(ChatError::Forbidden);
        }
        Ok(session)
    }

    // --- Session lifecycle ---

    /// Create a new chat session for a user.
    ///
    /// An explicit configuration key must name a known profile; when absent
    /// the session uses `default`.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        config_key: Option<String>,
    ) -> Result<ChatSession, ChatError> {
        let config_key = match config_key {
            Some(key) => {
                if !self.configurations.contains_key(&key) {
                    return Err(ChatError::Validation(format!(
                        "unknown configuration key: '{key}'"
                    )));
                }
                key
            }
            None => DEFAULT_PROFILE_KEY.to_string(),
        };

        let session = ChatSession {
            id: Uuid::now_v7(),
            user_id,
            title: None,
            config_key,
            created_at: Utc::now(),
        };

        let session = self.repo.create_session(&session).await?;
        info!(session_id = %session.id, config_key = %session.config_key, "Chat session created");
        Ok(session)
    }

    /// List the caller's sessions, most recent first.
    pub async fn list_sessions(
        &self,
        user_id: &Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ChatSession>, ChatError> {
        Ok(self.repo.list_sessions(user_id, limit, offset).await?)
    }

    /// Rename a session. The title is required and capped at
    /// [`MAX_TITLE_LEN`] characters.
    pub async fn rename_session(
        &self,
        user_id: &Uuid,
        session_id: &Uuid,
        title: &str,
    ) -> Result<(), ChatError> {
        self.session_for_user(user_id, session_id).await?;
        validate_title(title)?;
        self.repo.update_session_title(session_id, title).await?;
        Ok(())
    }

    /// Delete a session; its messages and their feedback cascade away.
    pub async fn delete_session(
        &self,
        user_id: &Uuid,
        session_id: &Uuid,
    ) -> Result<(), ChatError> {
        self.session_for_user(user_id, session_id).await?;
        self.repo.delete_session(session_id).await?;
        info!(session_id = %session_id, "Chat session deleted");
        Ok(())
    }

    /// Full message history for a session, ascending by creation time,
    /// annotated with the caller's own feedback ratings.
    pub async fn history(
        &self,
        user_id: &Uuid,
        session_id: &Uuid,
    ) -> Result<Vec<HistoryEntry>, ChatError> {
        self.session_for_user(user_id, session_id).await?;
        Ok(self.repo.get_history(session_id, user_id).await?)
    }

    // --- Message exchange ---

    /// Handle one conversation turn: persist the user message, lazily
    /// title the session, resolve the AI configuration, dispatch to the
    /// provider, and persist the reply.
    ///
    /// Exactly one user turn and one AI turn (the reply, or a sentinel on
    /// provider failure) are appended per call.
    #[tracing::instrument(name = "submit_message", skip(self, text), fields(session_id = %session_id))]
    pub async fn submit_message(
        &self,
        user_id: &Uuid,
        session_id: &Uuid,
        text: &str,
    ) -> Result<ChatReply, ChatError> {
        validate_message_text(text)?;
        let session = self.session_for_user(user_id, session_id).await?;

        let user_message = ChatMessage {
            id: Uuid::now_v7(),
            session_id: *session_id,
            sender: Sender::User,
            body: text.to_string(),
            created_at: Utc::now(),
        };
        self.repo.save_message(&user_message).await?;

        // Lazy title: at most once per session, best-effort. Uses the
        // default profile regardless of the session's own configuration.
        let mut session_title = session.title.clone();
        if session_title.is_none() {
            match self.generate_session_title(session_id, text).await {
                Ok(title) => session_title = title,
                Err(err) => {
                    error!(session_id = %session_id, error = %err, "Chat title generation failed");
                }
            }
        }

        let (effective_key, profile) = self.resolve_profile(&session)?;

        let system_prompt = match self.prompts.render(&profile.system_prompt) {
            Some(text) => text.to_string(),
            None => {
                warn!(
                    template = %profile.system_prompt,
                    config_key = %effective_key,
                    "System prompt template not found, using empty prompt"
                );
                String::new()
            }
        };

        let outcome = self
            .dispatch(profile, &system_prompt, text)
            .await;

        match outcome {
            Ok(reply_text) => {
                let ai_message = ChatMessage {
                    id: Uuid::now_v7(),
                    session_id: *session_id,
                    sender: Sender::Ai,
                    body: reply_text.clone(),
                    created_at: Utc::now(),
                };
                self.repo.save_message(&ai_message).await?;

                Ok(ChatReply {
                    reply: reply_text,
                    ai_message_id: ai_message.id,
                    session_title,
                })
            }
            Err(err) => {
                error!(
                    config_key = %effective_key,
                    provider = %profile.provider,
                    model = %profile.model,
                    error = %err,
                    "AI provider request failed"
                );
                let ai_message = ChatMessage {
                    id: Uuid::now_v7(),
                    session_id: *session_id,
                    sender: Sender::Ai,
                    body: ERROR_REPLY.to_string(),
                    created_at: Utc::now(),
                };
                self.repo.save_message(&ai_message).await?;
                Err(ChatError::Upstream(err.to_string()))
            }
        }
    }

    /// Resolve the session's configuration key to a profile, falling back
    /// to `default` for unknown keys. The stored session row is never
    /// mutated by the fallback.
    fn resolve_profile<'a>(
        &'a self,
        session: &'a ChatSession,
    ) -> Result<(&'a str, &'a AiProfile), ChatError> {
        if let Some(profile) = self.configurations.get(&session.config_key) {
            return Ok((session.config_key.as_str(), profile));
        }

        warn!(
            config_key = %session.config_key,
            session_id = %session.id,
            "Unknown configuration key, falling back to default"
        );
        match self.configurations.default_profile() {
            Some(profile) => Ok((DEFAULT_PROFILE_KEY, profile)),
            None => {
                error!("Default AI configuration is missing");
                Err(ChatError::ServerConfiguration)
            }
        }
    }

    /// One provider round-trip. An unregistered provider name is reported
    /// the same way as any other upstream failure.
    async fn dispatch(
        &self,
        profile: &AiProfile,
        system_prompt: &str,
        text: &str,
    ) -> Result<String, LlmError> {
        let provider = self.providers.get(&profile.provider).ok_or_else(|| {
            LlmError::Provider {
                message: format!("provider '{}' is not registered", profile.provider),
            }
        })?;

        let request = CompletionRequest {
            model: profile.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: text.to_string(),
            }],
            system: (!system_prompt.is_empty()).then(|| system_prompt.to_string()),
            max_tokens: REPLY_MAX_TOKENS,
            temperature: None,
        };

        let response = provider.complete(&request).await?;
        Ok(response.content)
    }

    /// Generate and store a title for a session from its first user
    /// message. Returns the stored title, or `None` when generation was
    /// skipped or produced nothing.
    async fn generate_session_title(
        &self,
        session_id: &Uuid,
        first_message: &str,
    ) -> Result<Option<String>, ChatError> {
        let Some(profile) = self.configurations.default_profile() else {
            warn!("Skipping title generation: default AI configuration is missing");
            return Ok(None);
        };
        let Some(provider) = self.providers.get(&profile.provider) else {
            warn!(provider = %profile.provider, "Skipping title generation: provider not registered");
            return Ok(None);
        };

        let raw = generate_title(provider, &profile.model, first_message)
            .await
            .map_err(|err| ChatError::Upstream(err.to_string()))?;

        let title: String = raw.chars().take(MAX_TITLE_LEN).collect();
        if title.is_empty() {
            return Ok(None);
        }

        self.repo.update_session_title(session_id, &title).await?;
        info!(session_id = %session_id, "Session title generated");
        Ok(Some(title))
    }
}

fn validate_message_text(text: &str) -> Result<(), ChatError> {
    if text.trim().is_empty() {
        return Err(ChatError::Validation(
            "message must not be empty".to_string(),
        ));
    }
    if text.chars().count() > MAX_MESSAGE_LEN {
        return Err(ChatError::Validation(format!(
            "message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), ChatError> {
    if title.trim().is_empty() {
        return Err(ChatError::Validation("title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ChatError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}
