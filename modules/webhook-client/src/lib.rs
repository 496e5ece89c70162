pub mod error;

pub use error::{Result, WebhookError};

use std::time::Duration;

/// Thin HTTP client for hitting configured webhook endpoints.
///
/// One call per invocation, no retry — redelivery is the transport layer's
/// job. The timeout bounds every request so a hung endpoint cannot stall
/// the worker.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// GET the URL. No request body.
    pub async fn get(&self, url: &str) -> Result<()> {
        self.check(self.client.get(url).send().await?).await
    }

    /// DELETE the URL. No request body.
    pub async fn delete(&self, url: &str) -> Result<()> {
        self.check(self.client.delete(url).send().await?).await
    }

    /// POST the JSON payload to the URL.
    pub async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<()> {
        self.check(self.client.post(url).json(body).send().await?)
            .await
    }

    /// PUT the JSON payload to the URL.
    pub async fn put_json(&self, url: &str, body: &serde_json::Value) -> Result<()> {
        self.check(self.client.put(url).json(body).send().await?)
            .await
    }

    async fn check(&self, resp: reqwest::Response) -> Result<()> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(WebhookError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
