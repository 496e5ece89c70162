use thiserror::Error;

pub type Result<T> = std::result::Result<T, WebhookError>;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Webhook returned status {status}: {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for WebhookError {
    fn from(err: reqwest::Error) -> Self {
        WebhookError::Network(err.to_string())
    }
}
