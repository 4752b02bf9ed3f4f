//! ChatIntegration implementation for Slack

use async_trait::async_trait;
use relay::domain::errors::DomainError;
use relay::ports::integration::{ChatIntegration, IntegrationEvent, RequestSignature};
use tracing::{debug, warn};

use crate::client::{SlackApiError, SlackClient};
use crate::config::SlackConfig;
use crate::webhook::SlackWebhookHandler;

/// Slack integration implementing ChatIntegration trait
pub struct SlackIntegration {
    client: SlackClient,
    webhook: SlackWebhookHandler,
}

impl SlackIntegration {
    /// Create a new Slack integration
    pub fn new(config: SlackConfig) -> Result<Self, SlackApiError> {
        let webhook = match &config.signing_secret {
            Some(secret) => {
                SlackWebhookHandler::with_signing_secret(secret, config.signature_tolerance_secs)
            }
            None => SlackWebhookHandler::new(),
        };
        let client = SlackClient::new(config)?;
        Ok(Self { client, webhook })
    }
}

#[async_trait]
impl ChatIntegration for SlackIntegration {
    fn name(&self) -> &str {
        "slack"
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), DomainError> {
        let response = self
            .client
            .send_message(channel_id, text)
            .await
            .map_err(|e| DomainError::ExternalService(format!("Slack API error: {}", e)))?;

        debug!(
            channel_id = %channel_id,
            resolved_channel = ?response.channel,
            ts = ?response.ts,
            "Posted message to Slack"
        );

        Ok(())
    }

    fn parse_event(&self, payload: &[u8]) -> Result<IntegrationEvent, DomainError> {
        self.webhook.parse_event(payload)
    }

    fn verify_request(
        &self,
        signature: &RequestSignature<'_>,
        payload: &[u8],
    ) -> Result<(), DomainError> {
        if !self.webhook.verifies_signatures() {
            return Ok(());
        }

        let (Some(sig), Some(ts)) = (signature.signature, signature.timestamp) else {
            warn!("Slack request is missing signature headers");
            return Err(DomainError::Validation(
                "Missing Slack signature headers".into(),
            ));
        };

        if self.webhook.verify_signature(sig, ts, payload)? {
            Ok(())
        } else {
            Err(DomainError::Validation(
                "Invalid Slack request signature".into(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    #[test]
    fn test_config_builder() {
        let config = SlackConfig::new("xoxb-test")
            .with_signing_secret("secret")
            .with_api_base_url("http://localhost:9999/api/");

        assert_eq!(config.bot_token, "xoxb-test");
        assert_eq!(config.signing_secret.as_deref(), Some("secret"));
        assert_eq!(config.api_base_url, "http://localhost:9999/api");
    }

    #[test]
    fn test_unsigned_requests_pass_without_secret() {
        let integration = SlackIntegration::new(SlackConfig::new("xoxb-test")).unwrap();

        assert!(integration
            .verify_request(&RequestSignature::default(), b"{}")
            .is_ok());
    }

    #[test]
    fn test_signed_request_verifies() {
        let integration =
            SlackIntegration::new(SlackConfig::new("xoxb-test").with_signing_secret("secret"))
                .unwrap();
        let ts = now();
        let body = br#"{"challenge":"abc"}"#;
        let sig = SlackWebhookHandler::sign("secret", &ts, body);

        let signature = RequestSignature {
            timestamp: Some(&ts),
            signature: Some(&sig),
        };
        assert!(integration.verify_request(&signature, body).is_ok());
    }

    #[test]
    fn test_missing_headers_rejected_with_secret() {
        let integration =
            SlackIntegration::new(SlackConfig::new("xoxb-test").with_signing_secret("secret"))
                .unwrap();

        let err = integration
            .verify_request(&RequestSignature::default(), b"{}")
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let integration =
            SlackIntegration::new(SlackConfig::new("xoxb-test").with_signing_secret("secret"))
                .unwrap();
        let ts = now();
        let sig = SlackWebhookHandler::sign("other-secret", &ts, b"{}");

        let signature = RequestSignature {
            timestamp: Some(&ts),
            signature: Some(&sig),
        };
        assert!(integration.verify_request(&signature, b"{}").is_err());
    }
}
