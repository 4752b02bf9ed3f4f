//! Slack configuration

use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";

/// Maximum accepted age of a signed request, in seconds
const DEFAULT_SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Configuration for Slack integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Bot token (xoxb-...)
    pub bot_token: String,
    /// Signing secret for request verification (disabled when unset)
    pub signing_secret: Option<String>,
    /// Web API base URL
    pub api_base_url: String,
    /// Accepted clock skew for signed requests
    pub signature_tolerance_secs: i64,
}

impl SlackConfig {
    /// Create a new Slack configuration with just a bot token
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            ..Self::default()
        }
    }

    /// Enable request signature verification
    pub fn with_signing_secret(mut self, secret: impl Into<String>) -> Self {
        self.signing_secret = Some(secret.into());
        self
    }

    /// Override the Web API base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            signing_secret: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            signature_tolerance_secs: DEFAULT_SIGNATURE_TOLERANCE_SECS,
        }
    }
}
