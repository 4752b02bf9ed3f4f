//! Completion Application Service
//!
//! Answers a message in the voice of a stored persona: the persona text
//! becomes the system message, the message becomes the user turn.

use std::sync::Arc;

use relay::{ChatMessage, CompletionOptions, DomainError, LlmProvider, PersonaRepository};

/// Output bound for synchronous ask requests
pub const ASK_MAX_TOKENS: u32 = 150;

pub struct CompletionService<R: PersonaRepository + ?Sized, L: LlmProvider + ?Sized> {
    repo: Arc<R>,
    llm: Arc<L>,
}

impl<R, L> CompletionService<R, L>
where
    R: PersonaRepository + ?Sized,
    L: LlmProvider + ?Sized,
{
    pub fn new(repo: Arc<R>, llm: Arc<L>) -> Self {
        Self { repo, llm }
    }

    /// Complete `text` as persona `persona_name`, bounded to `max_tokens`
    pub async fn complete_as(
        &self,
        persona_name: &str,
        text: &str,
        max_tokens: u32,
    ) -> Result<String, DomainError> {
        let persona = self
            .repo
            .find_by_name(persona_name)
            .await?
            .ok_or_else(|| DomainError::not_found("Persona", persona_name))?;

        let messages = vec![
            ChatMessage::system(persona.prompt_text),
            ChatMessage::user(text),
        ];

        let response = self
            .llm
            .complete(&messages, &CompletionOptions::with_max_tokens(max_tokens))
            .await?;

        tracing::info!(
            "Completion for persona {} via {} ({}) - {} tokens",
            persona_name,
            self.llm.provider_name(),
            response.model,
            response.usage.total_tokens
        );

        Ok(response.content)
    }

    /// Synchronous ask with the fixed output bound
    pub async fn ask(&self, persona_name: &str, question: &str) -> Result<String, DomainError> {
        self.complete_as(persona_name, question, ASK_MAX_TOKENS)
            .await
    }
}
