use anyhow::{Context, Result};
use async_trait::async_trait;

use actioneer_common::{ActionMessage, ReactionMessage};
use actioneer_engine::OutboundQueue;
use webhook_client::WebhookClient;

/// Outbound queue client: delivers evaluated messages to the configured
/// actions and reactions destinations over HTTP.
pub struct HttpQueue {
    http: WebhookClient,
    actions_url: String,
    reactions_url: String,
}

impl HttpQueue {
    pub fn new(http: WebhookClient, actions_url: String, reactions_url: String) -> Self {
        Self {
            http,
            actions_url,
            reactions_url,
        }
    }
}

#[async_trait]
impl OutboundQueue for HttpQueue {
    async fn send_action(&self, message: &ActionMessage) -> Result<()> {
        let body = serde_json::to_value(message).context("serializing action message")?;
        self.http
            .post_json(&self.actions_url, &body)
            .await
            .context("enqueueing action message")?;
        Ok(())
    }

    async fn send_reaction(&self, message: &ReactionMessage) -> Result<()> {
        let body = serde_json::to_value(message).context("serializing reaction message")?;
        self.http
            .post_json(&self.reactions_url, &body)
            .await
            .context("enqueueing reaction message")?;
        Ok(())
    }
}
