//! Dispatch coordinator — log the batch, send it, or tell the user why not.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::channel::ChannelSlot;
use crate::history::ConversationLog;
use crate::i18n::{fill, Translator};
use crate::types::{AttachmentBatch, OutboundMessage};

/// A local, user-facing notification (the shell decides how to show it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Files were read but no channel is attached.
    Pending { file_names: Vec<String> },
    /// A file could not be read; nothing was logged or sent.
    ProcessingFailed,
    /// Logged, but the channel rejected the message.
    SendFailed { file_names: Vec<String> },
}

impl Notice {
    pub fn render(&self, labels: &dyn Translator) -> String {
        match self {
            Notice::Pending { file_names } => fill(
                &labels.translate("footer.filesSelected"),
                &[("names", file_names.join(", ").as_str())],
            ),
            Notice::ProcessingFailed => labels.translate("footer.processingFailed"),
            Notice::SendFailed { file_names } => fill(
                &labels.translate("footer.sendFailed"),
                &[("names", file_names.join(", ").as_str())],
            ),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dispatched,
    NotifiedNoChannel,
    SendFailed,
}

pub struct Dispatcher {
    channel: Arc<ChannelSlot>,
    log: Arc<dyn ConversationLog>,
    notifier: Arc<dyn Notifier>,
    labels: Arc<dyn Translator>,
}

impl Dispatcher {
    pub fn new(
        channel: Arc<ChannelSlot>,
        log: Arc<dyn ConversationLog>,
        notifier: Arc<dyn Notifier>,
        labels: Arc<dyn Translator>,
    ) -> Self {
        Self {
            channel,
            log,
            notifier,
            labels,
        }
    }

    /// Hand a fully read batch to the log and the channel.
    ///
    /// The log entry is written before the send, so it survives a failed send.
    /// Without a channel nothing is logged and the user gets a pending notice.
    pub fn dispatch(&self, batch: AttachmentBatch) -> DispatchOutcome {
        let file_names = batch.names();

        let Some(channel) = self.channel.current() else {
            info!(
                "No channel attached, showing {} file(s) locally",
                file_names.len()
            );
            self.notifier.notify(Notice::Pending { file_names });
            return DispatchOutcome::NotifiedNoChannel;
        };

        self.log
            .append_human_message(&log_summary(self.labels.as_ref(), &file_names));

        let message = OutboundMessage::TextInputWithAttachments {
            text: channel_summary(self.labels.as_ref(), &file_names),
            attachments: batch,
        };
        match channel.send_message(message) {
            Ok(()) => {
                info!("Attachments sent to server: {}", file_names.join(", "));
                DispatchOutcome::Dispatched
            }
            Err(e) => {
                warn!("Failed to send attachments: {}", e);
                self.notifier.notify(Notice::SendFailed { file_names });
                DispatchOutcome::SendFailed
            }
        }
    }

    /// Surface a pick or read failure. No log entry, no send.
    pub fn report_failure(&self, err: &dyn std::error::Error) {
        error!("File processing error: {}", err);
        self.notifier.notify(Notice::ProcessingFailed);
    }

    /// Plain composer text: always logged, sent when a channel is attached.
    /// Returns whether the text went out.
    pub fn send_text(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.log.append_human_message(text);

        let Some(channel) = self.channel.current() else {
            warn!("No channel attached, message kept locally");
            return false;
        };
        match channel.send_message(OutboundMessage::TextInput {
            text: text.to_string(),
        }) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to send message: {}", e);
                false
            }
        }
    }
}

/// Entry written to the conversation log, e.g. `[附件] a.png, b.pdf`.
pub fn log_summary(labels: &dyn Translator, file_names: &[String]) -> String {
    format!(
        "{} {}",
        labels.translate("footer.attachmentPrefix"),
        file_names.join(", ")
    )
}

/// Text the receiving agent sees alongside the attachments.
pub fn channel_summary(labels: &dyn Translator, file_names: &[String]) -> String {
    fill(
        &labels.translate("footer.attachmentsSent"),
        &[
            ("count", file_names.len().to_string().as_str()),
            ("names", file_names.join(", ").as_str()),
        ],
    )
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording doubles shared by the dispatch and pipeline tests.

    use std::sync::Mutex;

    use super::*;
    use crate::channel::{Channel, ChannelError};

    /// Every side effect in the order it happened.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Effect {
        Append(String),
        Send(serde_json::Value),
        Notify(Notice),
    }

    #[derive(Default)]
    pub struct Recorder {
        pub effects: Mutex<Vec<Effect>>,
        pub fail_sends: bool,
    }

    impl Recorder {
        pub fn failing() -> Self {
            Self {
                fail_sends: true,
                ..Self::default()
            }
        }

        pub fn effects(&self) -> Vec<Effect> {
            self.effects.lock().unwrap().clone()
        }
    }

    impl Channel for Recorder {
        fn send_message(&self, message: OutboundMessage) -> Result<(), ChannelError> {
            self.effects
                .lock()
                .unwrap()
                .push(Effect::Send(serde_json::to_value(&message).unwrap()));
            if self.fail_sends {
                Err(ChannelError::Send("socket reset".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl ConversationLog for Recorder {
        fn append_human_message(&self, text: &str) {
            self.effects
                .lock()
                .unwrap()
                .push(Effect::Append(text.to_string()));
        }
    }

    impl Notifier for Recorder {
        fn notify(&self, notice: Notice) {
            self.effects.lock().unwrap().push(Effect::Notify(notice));
        }
    }

    /// A dispatcher whose log, channel and notifier all record into `recorder`.
    pub fn dispatcher(recorder: &Arc<Recorder>, with_channel: bool) -> Dispatcher {
        let slot = Arc::new(ChannelSlot::new());
        if with_channel {
            slot.attach(recorder.clone());
        }
        Dispatcher::new(
            slot,
            recorder.clone(),
            recorder.clone(),
            Arc::new(crate::i18n::Labels::default()),
        )
    }
}
