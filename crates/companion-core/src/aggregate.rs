//! Attachment aggregator — reads a whole selection concurrently, all or nothing.

use std::future::Future;
use std::time::Duration;

use futures::future::try_join_all;

use crate::reader::{self, ReadError};
use crate::types::{AttachmentBatch, EncodedAttachment, SelectedFile};

/// Read every file concurrently on the current task.
///
/// The batch keeps selection order. The first read error fails the whole
/// aggregate and the remaining reads are dropped.
pub async fn aggregate(
    files: Vec<SelectedFile>,
    read_timeout: Option<Duration>,
) -> Result<AttachmentBatch, ReadError> {
    aggregate_with(files, read_timeout, reader::read).await
}

async fn aggregate_with<R, F>(
    files: Vec<SelectedFile>,
    read_timeout: Option<Duration>,
    read: R,
) -> Result<AttachmentBatch, ReadError>
where
    R: Fn(SelectedFile) -> F,
    F: Future<Output = Result<EncodedAttachment, ReadError>>,
{
    if files.is_empty() {
        return Err(ReadError::EmptySelection);
    }

    let reads = files
        .into_iter()
        .map(|file| read_with_timeout(file, read_timeout, &read));
    let attachments = try_join_all(reads).await?;

    AttachmentBatch::new(attachments).ok_or(ReadError::EmptySelection)
}

async fn read_with_timeout<R, F>(
    file: SelectedFile,
    limit: Option<Duration>,
    read: &R,
) -> Result<EncodedAttachment, ReadError>
where
    R: Fn(SelectedFile) -> F,
    F: Future<Output = Result<EncodedAttachment, ReadError>>,
{
    let Some(limit) = limit else {
        return read(file).await;
    };
    let name = file.name.clone();
    tokio::time::timeout(limit, read(file))
        .await
        .map_err(|_| ReadError::TimedOut { name })?
}
