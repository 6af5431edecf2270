//! Communication channel seam — a nullable slot plus an mpsc-backed outbox.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::types::OutboundMessage;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The receiving side is gone.
    #[error("channel closed")]
    Closed,
    /// Transport failure reported by a [`Channel`] implementation.
    #[error("send failed: {0}")]
    Send(String),
}

/// Fire-and-forget sender. No acknowledgement is awaited.
pub trait Channel: Send + Sync {
    fn send_message(&self, message: OutboundMessage) -> Result<(), ChannelError>;
}

/// Holds the live channel, if any. The surrounding app attaches on connect
/// and detaches on disconnect.
#[derive(Default)]
pub struct ChannelSlot {
    inner: RwLock<Option<Arc<dyn Channel>>>,
}

impl ChannelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, channel: Arc<dyn Channel>) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Some(channel);
    }

    pub fn detach(&self) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn current(&self) -> Option<Arc<dyn Channel>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_attached(&self) -> bool {
        self.current().is_some()
    }
}

/// Channel that queues messages for a writer task.
#[derive(Debug, Clone)]
pub struct OutboxChannel {
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl OutboxChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Channel for OutboxChannel {
    fn send_message(&self, message: OutboundMessage) -> Result<(), ChannelError> {
        self.tx.send(message).map_err(|_| ChannelError::Closed)
    }
}

/// Drain `rx` into `path`, one JSON object per line, until every sender is gone.
pub async fn write_outbox(
    mut rx: mpsc::UnboundedReceiver<OutboundMessage>,
    path: PathBuf,
) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await
        .with_context(|| format!("Failed to open outbox: {}", path.display()))?;

    info!("Writing outbound messages to {}", path.display());
    while let Some(message) = rx.recv().await {
        match serde_json::to_string(&message) {
            Ok(mut line) => {
                line.push('\n');
                file.write_all(line.as_bytes())
                    .await
                    .context("Failed to write outbox")?;
                file.flush().await.context("Failed to flush outbox")?;
            }
            Err(e) => error!("Failed to serialize outbound message: {}", e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_attach_detach() {
        let slot = ChannelSlot::new();
        assert!(!slot.is_attached());

        let (channel, _rx) = OutboxChannel::new();
        slot.attach(Arc::new(channel));
        assert!(slot.is_attached());

        slot.detach();
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_outbox_closed_after_receiver_dropped() {
        let (channel, rx) = OutboxChannel::new();
        drop(rx);
        let result = channel.send_message(OutboundMessage::TextInput {
            text: "hi".to_string(),
        });
        assert!(matches!(result, Err(ChannelError::Closed)));
    }

    #[tokio::test]
    async fn test_write_outbox_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outbox.jsonl");

        let (channel, rx) = OutboxChannel::new();
        channel
            .send_message(OutboundMessage::TextInput {
                text: "one".to_string(),
            })
            .unwrap();
        channel
            .send_message(OutboundMessage::TextInput {
                text: "two".to_string(),
            })
            .unwrap();
        drop(channel);

        write_outbox(rx, path.clone()).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "text-input");
        assert_eq!(lines[1]["text"], "two");
    }
}
