//! Slack Events API webhook handling

use hmac::{Hmac, Mac};
use relay::domain::errors::DomainError;
use relay::ports::integration::IntegrationEvent;
use serde_json::Value;
use sha2::Sha256;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_VERSION: &str = "v0";

/// Slack webhook handler for incoming events
pub struct SlackWebhookHandler {
    /// Signing secret for signature verification (optional)
    signing_secret: Option<String>,
    tolerance_secs: i64,
}

impl SlackWebhookHandler {
    /// Create a webhook handler without signature verification
    pub fn new() -> Self {
        Self {
            signing_secret: None,
            tolerance_secs: 300,
        }
    }

    /// Create a webhook handler with signature verification
    pub fn with_signing_secret(secret: impl Into<String>, tolerance_secs: i64) -> Self {
        Self {
            signing_secret: Some(secret.into()),
            tolerance_secs,
        }
    }

    pub fn verifies_signatures(&self) -> bool {
        self.signing_secret.is_some()
    }

    /// Classify an Events API payload.
    ///
    /// Checked in order: URL verification challenge, bot-originated event,
    /// user message. Anything that fits none of them is a validation error.
    pub fn parse_event(&self, payload: &[u8]) -> Result<IntegrationEvent, DomainError> {
        let json: Value = serde_json::from_slice(payload)
            .map_err(|e| DomainError::Validation(format!("Invalid JSON in webhook: {}", e)))?;

        let envelope = json
            .as_object()
            .ok_or_else(|| DomainError::Validation("Webhook body is not an object".into()))?;

        if let Some(challenge) = envelope.get("challenge").filter(|c| !c.is_null()) {
            debug!("Received Slack url_verification challenge");
            return Ok(IntegrationEvent::UrlVerification {
                challenge: value_to_text(challenge),
            });
        }

        let event = envelope
            .get("event")
            .and_then(Value::as_object)
            .ok_or_else(|| DomainError::missing_field("event"))?;

        if let Some(bot_id) = event.get("bot_id").filter(|b| !b.is_null()) {
            debug!(bot_id = %bot_id, "Ignoring bot-originated Slack event");
            return Ok(IntegrationEvent::BotMessage {
                bot_id: value_to_text(bot_id),
            });
        }

        let channel_id = event
            .get("channel")
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::missing_field("event.channel"))?;
        let text = event
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::missing_field("event.text"))?;

        Ok(IntegrationEvent::MessageReceived {
            channel_id: channel_id.to_string(),
            text: text.to_string(),
        })
    }

    /// Verify a Slack request signature against the current time
    pub fn verify_signature(
        &self,
        signature: &str,
        timestamp: &str,
        body: &[u8],
    ) -> Result<bool, DomainError> {
        self.verify_signature_at(signature, timestamp, body, chrono::Utc::now().timestamp())
    }

    /// Verify a Slack request signature as of `now` (unix seconds)
    pub fn verify_signature_at(
        &self,
        signature: &str,
        timestamp: &str,
        body: &[u8],
        now: i64,
    ) -> Result<bool, DomainError> {
        let Some(ref secret) = self.signing_secret else {
            warn!("Signature verification requested but no signing secret configured");
            return Ok(false);
        };

        let Ok(ts) = timestamp.parse::<i64>() else {
            warn!(timestamp = %timestamp, "Malformed Slack request timestamp");
            return Ok(false);
        };

        if now.abs_diff(ts) > self.tolerance_secs.unsigned_abs() {
            warn!(timestamp = %timestamp, now = %now, "Slack request timestamp too old");
            return Ok(false);
        }

        let Some(hex_sig) = signature.strip_prefix("v0=") else {
            return Ok(false);
        };
        let Ok(expected) = hex::decode(hex_sig) else {
            return Ok(false);
        };

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| DomainError::Validation(format!("Invalid signing secret: {}", e)))?;
        mac.update(base_string(timestamp, body).as_slice());

        Ok(mac.verify_slice(&expected).is_ok())
    }

    /// Compute the `X-Slack-Signature` value for a request
    pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> String {
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
        mac.update(base_string(timestamp, body).as_slice());
        format!(
            "{}={}",
            SIGNATURE_VERSION,
            hex::encode(mac.finalize().into_bytes())
        )
    }
}

impl Default for SlackWebhookHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// `v0:{timestamp}:{body}`
fn base_string(timestamp: &str, body: &[u8]) -> Vec<u8> {
    let mut base = format!("{}:{}:", SIGNATURE_VERSION, timestamp).into_bytes();
    base.extend_from_slice(body);
    base
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
