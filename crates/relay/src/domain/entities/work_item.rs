//! WorkItem - Queued question awaiting a reply

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// A pending question to be answered asynchronously.
///
/// Serialized as the opaque queue body
/// `{"channel_id": ..., "text": ..., "persona": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Destination channel for the reply
    pub channel_id: String,
    /// The user's raw message
    pub text: String,
    /// Persona to answer with (not checked at enqueue time)
    #[serde(rename = "persona")]
    pub persona_name: String,
}

impl WorkItem {
    pub fn new(
        channel_id: impl Into<String>,
        text: impl Into<String>,
        persona_name: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            text: text.into(),
            persona_name: persona_name.into(),
        }
    }

    /// Encode as a queue message body
    pub fn to_body(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from a queue message body
    pub fn from_body(body: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(body)?)
    }
}
