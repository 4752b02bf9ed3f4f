//! Chat Platform Integration Port
//!
//! Abstract interface for a messaging platform: inbound webhook events
//! are classified here, outbound replies are posted here.

use async_trait::async_trait;

use crate::domain::errors::DomainError;

/// Classified inbound webhook event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationEvent {
    /// One-time endpoint verification, the challenge must be echoed back
    UrlVerification { challenge: String },

    /// Event produced by a bot (including our own replies)
    BotMessage { bot_id: String },

    /// A user message to be answered
    MessageReceived { channel_id: String, text: String },
}

/// Signature material taken from an inbound webhook request
#[derive(Debug, Clone, Default)]
pub struct RequestSignature<'a> {
    pub timestamp: Option<&'a str>,
    pub signature: Option<&'a str>,
}

/// Chat platform interface
#[async_trait]
pub trait ChatIntegration: Send + Sync {
    /// Integration name (e.g., "slack")
    fn name(&self) -> &str;

    /// Post a text message to a channel
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), DomainError>;

    /// Classify a raw webhook payload
    fn parse_event(&self, payload: &[u8]) -> Result<IntegrationEvent, DomainError>;

    /// Verify that a webhook request originates from the platform.
    ///
    /// Integrations without request signing accept everything.
    fn verify_request(
        &self,
        _signature: &RequestSignature<'_>,
        _payload: &[u8],
    ) -> Result<(), DomainError> {
        Ok(())
    }
}
