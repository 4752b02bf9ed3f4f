//! Slack Web API client

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::SlackConfig;

#[derive(Debug, Error)]
pub enum SlackApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Slack API returned status {0}")]
    Status(u16),

    #[error("Slack API error: {0}")]
    Api(String),
}

/// Body of a `chat.postMessage` answer
#[derive(Debug, Deserialize)]
pub struct PostMessageResponse {
    pub ok: bool,
    pub error: Option<String>,
    pub channel: Option<String>,
    pub ts: Option<String>,
}

impl PostMessageResponse {
    /// Slack answers 200 even for logical failures, `ok` carries the result
    fn into_result(self) -> Result<Self, SlackApiError> {
        if self.ok {
            Ok(self)
        } else {
            Err(SlackApiError::Api(
                self.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}

/// Slack Web API client
pub struct SlackClient {
    http: Client,
    config: SlackConfig,
}

impl SlackClient {
    /// Create a new Slack client
    pub fn new(config: SlackConfig) -> Result<Self, SlackApiError> {
        let http = Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// Send a message to a channel
    pub async fn send_message(
        &self,
        channel_id: &str,
        text: &str,
    ) -> Result<PostMessageResponse, SlackApiError> {
        debug!(channel_id = %channel_id, text_len = %text.len(), "Sending message to Slack");

        let url = format!("{}/chat.postMessage", self.config.api_base_url);
        let response = self
            .http
            .post(&url)
            .form(&[
                ("token", self.config.bot_token.as_str()),
                ("channel", channel_id),
                ("text", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Slack chat.postMessage failed");
            return Err(SlackApiError::Status(status.as_u16()));
        }

        response
            .json::<PostMessageResponse>()
            .await?
            .into_result()
            .inspect_err(|e| error!(error = %e, "Failed to send Slack message"))
    }
}
