//! Picker trigger — one-shot file selection surfaces.
//!
//! A picker is consumed by [`FilePicker::pick`], so every attach action builds
//! a fresh one. An empty selection means the user cancelled. Every path the
//! user names ends up in the selection; one that cannot be read fails the
//! batch later in the reader, never here.

use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::types::{ByteSource, SelectedFile};

#[derive(Debug, Error)]
pub enum PickError {
    #[error("{name}: type {mime_type:?} is not accepted")]
    NotAccepted { name: String, mime_type: String },
}

/// Media and document types offered by the attach button.
pub const DEFAULT_ACCEPT: &[&str] = &[
    "image/*", "video/*", "audio/*", "text/*", ".pdf", ".doc", ".docx",
];

/// Accept tokens in the `<input type="file" accept=...>` style:
/// `.ext`, `type/*` or an exact MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptFilter {
    tokens: Vec<String>,
    multiple: bool,
}

impl AcceptFilter {
    pub fn new<I, S>(tokens: I, multiple: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            multiple,
        }
    }

    pub fn multiple(&self) -> bool {
        self.multiple
    }

    pub fn accepts(&self, name: &str, mime_type: &str) -> bool {
        let name = name.to_lowercase();
        let mime = mime_type.to_lowercase();
        self.tokens.iter().any(|token| {
            if token.starts_with('.') {
                name.ends_with(token.as_str())
            } else if let Some(major) = token.strip_suffix("/*") {
                mime.split_once('/').is_some_and(|(m, _)| m == major)
            } else {
                mime == *token
            }
        })
    }

    /// Comma-joined form, as shown in the attach prompt.
    pub fn to_accept_string(&self) -> String {
        self.tokens.join(",")
    }
}

impl Default for AcceptFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ACCEPT.iter().copied(), true)
    }
}

/// A single-use selection surface.
pub trait FilePicker {
    fn pick(
        self,
        accept: &AcceptFilter,
    ) -> impl Future<Output = Result<Vec<SelectedFile>, PickError>> + Send;
}

/// Picks a fixed list of paths (command line, drag and drop).
#[derive(Debug, Clone)]
pub struct PathListPicker {
    paths: Vec<PathBuf>,
}

impl PathListPicker {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl FilePicker for PathListPicker {
    async fn pick(self, accept: &AcceptFilter) -> Result<Vec<SelectedFile>, PickError> {
        resolve_paths(self.paths, accept).await
    }
}

/// The interactive side of a [`PromptPicker`]. Dropping it cancels the pick.
#[derive(Debug)]
pub struct PickerHandle {
    tx: oneshot::Sender<Vec<PathBuf>>,
}

impl PickerHandle {
    pub fn submit(self, paths: Vec<PathBuf>) {
        // The picker side is gone only if the pipeline task was aborted.
        let _ = self.tx.send(paths);
    }

    pub fn cancel(self) {}
}

/// Waits for the UI to submit paths through the paired [`PickerHandle`].
#[derive(Debug)]
pub struct PromptPicker {
    rx: oneshot::Receiver<Vec<PathBuf>>,
}

pub fn prompt() -> (PickerHandle, PromptPicker) {
    let (tx, rx) = oneshot::channel();
    (PickerHandle { tx }, PromptPicker { rx })
}

impl FilePicker for PromptPicker {
    async fn pick(self, accept: &AcceptFilter) -> Result<Vec<SelectedFile>, PickError> {
        match self.rx.await {
            Ok(paths) => resolve_paths(paths, accept).await,
            Err(_) => {
                info!("Picker closed without a selection");
                Ok(Vec::new())
            }
        }
    }
}

async fn resolve_paths(
    mut paths: Vec<PathBuf>,
    accept: &AcceptFilter,
) -> Result<Vec<SelectedFile>, PickError> {
    if !accept.multiple() && paths.len() > 1 {
        warn!("Single selection only, ignoring {} extra path(s)", paths.len() - 1);
        paths.truncate(1);
    }

    let mut selected = Vec::with_capacity(paths.len());
    for path in paths {
        selected.push(describe(&path, accept).await?);
    }
    Ok(selected)
}

async fn describe(path: &Path, accept: &AcceptFilter) -> Result<SelectedFile, PickError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_default();

    if !accept.accepts(&name, &mime_type) {
        return Err(PickError::NotAccepted { name, mime_type });
    }

    // Unreadable entries stay in the selection so the read fails the batch.
    let byte_size = match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => {
            warn!("{:?} is not a regular file", path);
            0
        }
        Err(e) => {
            warn!("Cannot stat {:?}: {}", path, e);
            0
        }
    };

    Ok(SelectedFile {
        name,
        mime_type,
        byte_size,
        source: ByteSource::Path(path.to_path_buf()),
    })
}

/// Split typed input into paths. Whitespace separates, double quotes group.
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in input.chars() {
        match ch {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    paths.push(PathBuf::from(std::mem::take(&mut current)));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(PathBuf::from(current));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = AcceptFilter::default();
        assert!(filter.multiple());
        assert!(filter.accepts("photo.png", "image/png"));
        assert!(filter.accepts("clip.mp4", "video/mp4"));
        assert!(filter.accepts("notes.txt", "text/plain"));
        assert!(filter.accepts("Report.PDF", ""));
        assert!(filter.accepts("essay.docx", "application/octet-stream"));
        assert!(!filter.accepts("archive.zip", "application/zip"));
        assert!(!filter.accepts("imagefile", "imagex/png"));
    }

    #[test]
    fn test_exact_mime_token() {
        let filter = AcceptFilter::new(["application/json"], true);
        assert!(filter.accepts("data", "application/json"));
        assert!(!filter.accepts("data.json", "text/plain"));
        assert_eq!(filter.to_accept_string(), "application/json");
    }

    #[tokio::test]
    async fn test_path_list_picker_keeps_every_path() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("photo.png");
        let txt = dir.path().join("notes.txt");
        std::fs::write(&png, vec![0u8; 10 * 1024]).unwrap();
        std::fs::write(&txt, vec![b'n'; 2 * 1024]).unwrap();

        let picker = PathListPicker::new(vec![png, dir.path().join("missing.png"), txt]);
        let files = picker.pick(&AcceptFilter::default()).await.unwrap();

        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["photo.png", "missing.png", "notes.txt"]);
        assert_eq!(files[0].mime_type, "image/png");
        assert_eq!(files[0].byte_size, 10 * 1024);
        assert_eq!(files[1].byte_size, 0);
        assert!(
            matches!(&files[1].source, ByteSource::Path(p) if p.ends_with("missing.png"))
        );
        assert_eq!(files[2].mime_type, "text/plain");
    }

    #[tokio::test]
    async fn test_rejected_type_fails_the_pick() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("photo.png");
        let zip = dir.path().join("bundle.zip");
        std::fs::write(&png, b"png").unwrap();
        std::fs::write(&zip, b"PK").unwrap();

        let err = PathListPicker::new(vec![png, zip])
            .pick(&AcceptFilter::default())
            .await
            .unwrap_err();
        match err {
            PickError::NotAccepted { name, mime_type } => {
                assert_eq!(name, "bundle.zip");
                assert_eq!(mime_type, "application/zip");
            }
        }
    }

    #[tokio::test]
    async fn test_single_select_takes_first() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, b"a").unwrap();
        std::fs::write(&b, b"b").unwrap();

        let filter = AcceptFilter::new(DEFAULT_ACCEPT.iter().copied(), false);
        let files = PathListPicker::new(vec![a, b]).pick(&filter).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.txt");
    }

    #[tokio::test]
    async fn test_prompt_cancel_yields_nothing() {
        let (handle, picker) = prompt();
        handle.cancel();
        assert!(picker
            .pick(&AcceptFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_prompt_submit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let (handle, picker) = prompt();
        let pending = tokio::spawn(async move { picker.pick(&AcceptFilter::default()).await });
        handle.submit(vec![path]);

        let files = pending.await.unwrap().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].mime_type, "application/pdf");
    }

    #[test]
    fn test_parse_path_list() {
        assert_eq!(
            parse_path_list(r#"a.png  "my notes.txt" /tmp/b.pdf"#),
            vec![
                PathBuf::from("a.png"),
                PathBuf::from("my notes.txt"),
                PathBuf::from("/tmp/b.pdf"),
            ]
        );
        assert!(parse_path_list("   ").is_empty());
    }
}
