//! Work Queue Port
//!
//! Durable at-least-once queue. Receiving a message hides it for the
//! visibility timeout; a message that is not acknowledged in that window
//! becomes visible again and is redelivered.

use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::{errors::DomainError, QueueMessage, WorkItem};

#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Enqueue an opaque message body, returns the message ID
    async fn send(&self, body: &str) -> Result<Uuid, DomainError>;

    /// Claim up to `max_messages` visible messages
    async fn receive(
        &self,
        max_messages: u32,
        visibility_timeout: Duration,
    ) -> Result<Vec<QueueMessage>, DomainError>;

    /// Acknowledge (delete) a claimed message
    async fn ack(&self, message_id: Uuid) -> Result<(), DomainError>;

    /// Enqueue a work item as its JSON body
    async fn send_work_item(&self, item: &WorkItem) -> Result<Uuid, DomainError> {
        let body = item.to_body()?;
        self.send(&body).await
    }
}
