//! Reply Service
//!
//! Processes one queued work item: complete it as the named persona and
//! post the answer back to the originating channel.

use std::sync::Arc;

use relay::{ChatIntegration, DomainError, LlmProvider, PersonaRepository, QueueMessage};

use super::CompletionService;

pub struct ReplyService<R, L, C>
where
    R: PersonaRepository + ?Sized,
    L: LlmProvider + ?Sized,
    C: ChatIntegration + ?Sized,
{
    completion: Arc<CompletionService<R, L>>,
    chat: Arc<C>,
    max_tokens: u32,
}

impl<R, L, C> ReplyService<R, L, C>
where
    R: PersonaRepository + ?Sized,
    L: LlmProvider + ?Sized,
    C: ChatIntegration + ?Sized,
{
    pub fn new(completion: Arc<CompletionService<R, L>>, chat: Arc<C>, max_tokens: u32) -> Self {
        Self {
            completion,
            chat,
            max_tokens,
        }
    }

    /// Handle a single queue message.
    ///
    /// An error means the message must not be acknowledged.
    pub async fn handle(&self, message: &QueueMessage) -> Result<(), DomainError> {
        let item = message.work_item()?;

        tracing::info!(
            "Work item {} (receive #{}): persona={} channel={}",
            message.id,
            message.receive_count,
            item.persona_name,
            item.channel_id
        );

        let reply = self
            .completion
            .complete_as(&item.persona_name, &item.text, self.max_tokens)
            .await?;

        self.chat.post_message(&item.channel_id, &reply).await?;

        tracing::info!(
            "Replied on {} to channel {}",
            self.chat.name(),
            item.channel_id
        );

        Ok(())
    }
}
