//! FooterEvent enum — broadcast from the attachment pipeline to UI shells via tokio::broadcast.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::dispatch::{Notice, Notifier};

/// Where one attach invocation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Picking,
    Reading,
    Dispatched,
    NotifiedNoChannel,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStatus {
    pub invocation: String,
    pub state: PipelineState,
}

/// Events broadcast to every subscriber (TUI, loggers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum FooterEvent {
    /// Pipeline moved to a new state
    #[serde(rename = "pipeline")]
    Pipeline(PipelineStatus),

    /// A local notification for the user
    #[serde(rename = "notice")]
    Notice(Notice),
}

impl FooterEvent {
    /// Serialize as `{"event": "...", "data": {...}}`
    pub fn to_ws_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Delivers notices as [`FooterEvent::Notice`] on the broadcast bus.
#[derive(Debug, Clone)]
pub struct EventNotifier {
    tx: broadcast::Sender<FooterEvent>,
}

impl EventNotifier {
    pub fn new(tx: broadcast::Sender<FooterEvent>) -> Self {
        Self { tx }
    }
}

impl Notifier for EventNotifier {
    fn notify(&self, notice: Notice) {
        // No subscribers means no UI to show it on.
        let _ = self.tx.send(FooterEvent::Notice(notice));
    }
}
