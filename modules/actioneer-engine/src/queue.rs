//! Outbound queue seam for evaluated messages.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use actioneer_common::{ActionMessage, ReactionMessage};

/// Destination for the messages the evaluator emits.
///
/// Implemented by the HTTP queue client in the server crate and by
/// [`MemoryQueue`] for tests.
#[async_trait]
pub trait OutboundQueue: Send + Sync {
    async fn send_action(&self, message: &ActionMessage) -> Result<()>;

    async fn send_reaction(&self, message: &ReactionMessage) -> Result<()>;
}

#[async_trait]
impl<Q: OutboundQueue + ?Sized> OutboundQueue for Arc<Q> {
    async fn send_action(&self, message: &ActionMessage) -> Result<()> {
        (**self).send_action(message).await
    }

    async fn send_reaction(&self, message: &ReactionMessage) -> Result<()> {
        (**self).send_reaction(message).await
    }
}

/// In-memory queue for testing. Thread-safe; share via `Arc` so the test
/// can assert on what was sent.
#[derive(Default)]
pub struct MemoryQueue {
    actions: Mutex<Vec<ActionMessage>>,
    reactions: Mutex<Vec<ReactionMessage>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<ActionMessage> {
        self.actions.lock().unwrap().clone()
    }

    pub fn reactions(&self) -> Vec<ReactionMessage> {
        self.reactions.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutboundQueue for MemoryQueue {
    async fn send_action(&self, message: &ActionMessage) -> Result<()> {
        self.actions.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn send_reaction(&self, message: &ReactionMessage) -> Result<()> {
        self.reactions.lock().unwrap().push(message.clone());
        Ok(())
    }
}
