//! QueueMessage - Envelope for a claimed queue entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WorkItem;
use crate::domain::errors::DomainError;

/// A message claimed from a durable queue.
///
/// Hidden from other consumers until acknowledged or until its
/// visibility timeout lapses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueMessage {
    pub id: Uuid,
    pub body: String,
    /// Number of times this message has been handed out, this delivery included
    pub receive_count: i32,
    pub enqueued_at: DateTime<Utc>,
}

impl QueueMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            body: body.into(),
            receive_count: 0,
            enqueued_at: Utc::now(),
        }
    }

    pub fn work_item(&self) -> Result<WorkItem, DomainError> {
        WorkItem::from_body(&self.body)
    }
}
