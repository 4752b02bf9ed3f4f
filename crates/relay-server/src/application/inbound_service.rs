//! Inbound Event Service
//!
//! Hands user messages off to the work queue so the webhook can answer
//! inside the platform's reply budget; the completion happens later in
//! the queue worker.

use std::sync::Arc;
use uuid::Uuid;

use relay::{DomainError, IntegrationEvent, WorkItem, WorkQueue};

/// What happened to one inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// Echo the challenge back to the platform
    Challenge(String),
    /// Bot-originated event, acknowledged and dropped
    IgnoredBot,
    /// Work item enqueued for the worker
    Enqueued { message_id: Uuid, item: WorkItem },
}

pub struct InboundEventService<Q: WorkQueue + ?Sized> {
    queue: Arc<Q>,
}

impl<Q: WorkQueue + ?Sized> InboundEventService<Q> {
    pub fn new(queue: Arc<Q>) -> Self {
        Self { queue }
    }

    /// Act on a classified event addressed to `persona_name`
    pub async fn accept(
        &self,
        persona_name: &str,
        event: IntegrationEvent,
    ) -> Result<InboundOutcome, DomainError> {
        match event {
            IntegrationEvent::UrlVerification { challenge } => {
                Ok(InboundOutcome::Challenge(challenge))
            }
            IntegrationEvent::BotMessage { bot_id } => {
                tracing::debug!("Ignoring event from bot {}", bot_id);
                Ok(InboundOutcome::IgnoredBot)
            }
            IntegrationEvent::MessageReceived { channel_id, text } => {
                let item = WorkItem::new(channel_id, text, persona_name);
                let message_id = self.queue.send_work_item(&item).await?;

                tracing::info!(
                    "Enqueued work item {} for persona {} (channel {})",
                    message_id,
                    item.persona_name,
                    item.channel_id
                );

                Ok(InboundOutcome::Enqueued { message_id, item })
            }
        }
    }
}
