//! Conversation history — append-only, optionally persisted as JSONL.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Append-only conversation log as seen by the footer.
pub trait ConversationLog: Send + Sync {
    fn append_human_message(&self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

pub struct ChatHistory {
    writer: Option<HistoryWriter>,
    entries: Mutex<Vec<ConversationEntry>>,
}

impl ChatHistory {
    pub fn in_memory() -> Self {
        Self {
            writer: None,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Open a JSONL-backed history, loading whatever is already on disk.
    /// Later appends are written by a background thread; dropping the
    /// history waits for them.
    pub fn open(path: &Path) -> Self {
        let history = Self {
            writer: Some(HistoryWriter::spawn(path.to_path_buf())),
            entries: Mutex::new(load_entries(path)),
        };
        info!(
            "Loaded {} conversation entries from {}",
            history.len(),
            path.display()
        );
        history
    }

    pub fn append(&self, role: Role, content: &str) {
        let entry = ConversationEntry {
            role,
            content: content.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        if let Some(writer) = &self.writer {
            writer.write(entry.clone());
        }
        self.lock().push(entry);
    }

    pub fn entries(&self) -> Vec<ConversationEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ConversationEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConversationLog for ChatHistory {
    fn append_human_message(&self, text: &str) {
        self.append(Role::Human, text);
    }
}

fn load_entries(path: &Path) -> Vec<ConversationEntry> {
    if !path.is_file() {
        return Vec::new();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    error!("Failed to parse conversation line: {}", e);
                    None
                }
            })
            .collect(),
        Err(e) => {
            error!("Failed to load conversation history: {}", e);
            Vec::new()
        }
    }
}

/// Appends entries to the JSONL file on its own thread, in arrival order,
/// so callers on the async runtime never block on disk.
struct HistoryWriter {
    path: PathBuf,
    tx: Option<mpsc::Sender<ConversationEntry>>,
    thread: Option<JoinHandle<()>>,
}

impl HistoryWriter {
    fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel::<ConversationEntry>();
        let thread_path = path.clone();
        let spawned = std::thread::Builder::new()
            .name("history-writer".to_string())
            .spawn(move || {
                for entry in rx {
                    persist_logged(&thread_path, &entry);
                }
            });

        match spawned {
            Ok(thread) => Self {
                path,
                tx: Some(tx),
                thread: Some(thread),
            },
            Err(e) => {
                error!("Failed to start history writer, writing inline: {}", e);
                Self {
                    path,
                    tx: None,
                    thread: None,
                }
            }
        }
    }

    fn write(&self, entry: ConversationEntry) {
        let Some(tx) = &self.tx else {
            persist_logged(&self.path, &entry);
            return;
        };
        if let Err(mpsc::SendError(entry)) = tx.send(entry) {
            error!("History writer stopped, writing inline");
            persist_logged(&self.path, &entry);
        }
    }
}

impl Drop for HistoryWriter {
    fn drop(&mut self) {
        // Closing the channel ends the thread once the backlog is written.
        self.tx.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("History writer panicked");
            }
        }
    }
}

fn persist_logged(path: &Path, entry: &ConversationEntry) {
    if let Err(e) = persist(path, entry) {
        error!("Failed to persist conversation entry: {}", e);
    }
}

fn persist(path: &Path, entry: &ConversationEntry) -> std::io::Result<()> {
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(line.as_bytes())
}
