//! Server configuration from Shuttle secrets

use anyhow::{anyhow, Context, Result};
use relay_integration_slack::SlackConfig;
use std::str::FromStr;
use std::time::Duration;

use crate::adapters::openai::OpenAiConfig;
use crate::adapters::postgres::WorkQueueConfig;
use crate::services::queue_poller::PollerConfig;

/// Typed view over the secrets the server reads at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai: OpenAiConfig,
    /// Output bound for queued replies
    pub max_reply_tokens: u32,
    pub slack: SlackConfig,
    /// Bearer key for the admin routes (auth disabled when unset)
    pub api_key: Option<String>,
    pub queue: WorkQueueConfig,
    pub poller: PollerConfig,
}

impl AppConfig {
    pub fn from_secrets(secrets: &shuttle_runtime::SecretStore) -> Result<Self> {
        Self::from_lookup(|key| secrets.get(key))
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| anyhow!("missing secret {key}"));

        let mut openai = OpenAiConfig::new(require("OPENAI_API_KEY")?);
        if let Some(model) = get("OPENAI_MODEL") {
            openai.model = model;
        }
        if let Some(base_url) = get("OPENAI_BASE_URL") {
            openai.base_url = base_url.trim_end_matches('/').to_string();
        }

        let max_reply_tokens = parse(&require("MAX_OPENAI_TOKENS")?, "MAX_OPENAI_TOKENS")?;

        let mut slack = SlackConfig::new(require("SLACK_BOT_TOKEN")?);
        if let Some(secret) = get("SLACK_SIGNING_SECRET") {
            slack = slack.with_signing_secret(secret);
        }

        let mut queue = WorkQueueConfig::default();
        if let Some(v) = get("QUEUE_MAX_RECEIVE_COUNT") {
            queue.max_receive_count = parse(&v, "QUEUE_MAX_RECEIVE_COUNT")?;
        }

        let mut poller = PollerConfig::default();
        if let Some(v) = get("QUEUE_VISIBILITY_TIMEOUT_SECS") {
            poller.visibility_timeout =
                Duration::from_secs(parse(&v, "QUEUE_VISIBILITY_TIMEOUT_SECS")?);
        }
        if let Some(v) = get("QUEUE_POLL_INTERVAL_MS") {
            poller.poll_interval = Duration::from_millis(parse(&v, "QUEUE_POLL_INTERVAL_MS")?);
        }
        if let Some(v) = get("QUEUE_WORKERS") {
            poller.workers = parse(&v, "QUEUE_WORKERS")?;
        }

        Ok(Self {
            openai,
            max_reply_tokens,
            slack,
            api_key: get("RELAY_API_KEY"),
            queue,
            poller,
        })
    }
}

fn parse<T>(value: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {key}: {value:?}"))
}
