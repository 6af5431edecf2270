//! Core types — AiState, SelectedFile, EncodedAttachment, OutboundMessage, etc.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ── AI state (status indicator) ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiState {
    Idle,
    ThinkingSpeaking,
    Interrupted,
    Loading,
    Listening,
    Waiting,
}

impl std::fmt::Display for AiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiState::Idle => write!(f, "idle"),
            AiState::ThinkingSpeaking => write!(f, "thinking-speaking"),
            AiState::Interrupted => write!(f, "interrupted"),
            AiState::Loading => write!(f, "loading"),
            AiState::Listening => write!(f, "listening"),
            AiState::Waiting => write!(f, "waiting"),
        }
    }
}

// ── Selection (picker output) ──

/// Where a selected file's bytes come from.
#[derive(Debug, Clone)]
pub enum ByteSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// A file handed over by a picker. Consumed once by the reader.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub byte_size: u64,
    pub source: ByteSource,
}

impl SelectedFile {
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            byte_size: bytes.len() as u64,
            source: ByteSource::Memory(bytes.into()),
        }
    }
}

// ── Attachments ──

/// One file, fully read and encoded as a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedAttachment {
    pub name: String,
    pub data: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
}

/// Non-empty, selection-ordered set of attachments. Only the aggregator builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttachmentBatch(Vec<EncodedAttachment>);

impl AttachmentBatch {
    pub(crate) fn new(attachments: Vec<EncodedAttachment>) -> Option<Self> {
        if attachments.is_empty() {
            None
        } else {
            Some(Self(attachments))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EncodedAttachment> {
        self.0.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|a| a.name.clone()).collect()
    }

    pub fn into_inner(self) -> Vec<EncodedAttachment> {
        self.0
    }
}

// ── Outbound (to the communication channel) ──

/// Messages this footer puts on the wire. Serialized as `{"type": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundMessage {
    TextInput {
        text: String,
    },
    TextInputWithAttachments {
        text: String,
        attachments: AttachmentBatch,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attachment(name: &str) -> EncodedAttachment {
        EncodedAttachment {
            name: name.to_string(),
            data: "data:text/plain;base64,aGk=".to_string(),
            mime_type: "text/plain".to_string(),
            size: 2,
        }
    }

    #[test]
    fn test_batch_rejects_empty() {
        assert!(AttachmentBatch::new(Vec::new()).is_none());
    }

    #[test]
    fn test_attachment_wire_shape() {
        let batch = AttachmentBatch::new(vec![attachment("hi.txt")]).unwrap();
        let msg = OutboundMessage::TextInputWithAttachments {
            text: "summary".to_string(),
            attachments: batch,
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "text-input-with-attachments",
                "text": "summary",
                "attachments": [
                    {"name": "hi.txt", "data": "data:text/plain;base64,aGk=", "type": "text/plain", "size": 2}
                ]
            })
        );
    }

    #[test]
    fn test_text_input_wire_shape() {
        let msg = OutboundMessage::TextInput {
            text: "hello".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "text-input", "text": "hello"})
        );
    }

    #[test]
    fn test_ai_state_display_matches_serde() {
        let state = AiState::ThinkingSpeaking;
        assert_eq!(state.to_string(), "thinking-speaking");
        assert_eq!(
            serde_json::to_value(state).unwrap(),
            json!("thinking-speaking")
        );
    }
}
