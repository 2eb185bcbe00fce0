//! Event sink interface for block results.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("event sink is closed")]
    Closed,
    #[error("event sink rejected event: {0}")]
    Rejected(String),
}

/// Downstream consumer of decoded operation payloads.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Value) -> Result<(), SinkError>;
}

/// Forwards events into a tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Value>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Value>) -> Self {
        Self { tx }
    }

    /// A sink plus the receiving end of its channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Value>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, event: Value) -> Result<(), SinkError> {
        self.tx.send(event).await.map_err(|_| SinkError::Closed)
    }
}
