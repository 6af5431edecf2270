//! File reader — turns one selected file into a data-URL attachment.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::types::{ByteSource, EncodedAttachment, SelectedFile};

/// MIME type used in the data URL when the picker could not tell.
pub const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out reading {name}")]
    TimedOut { name: String },

    #[error("no files selected")]
    EmptySelection,
}

#[derive(Debug, thiserror::Error)]
pub enum DataUrlError {
    #[error("missing data: prefix")]
    MissingPrefix,
    #[error("data URL is not base64 encoded")]
    NotBase64,
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
}

/// Read the full content of `file` and encode it. No retry.
pub async fn read(file: SelectedFile) -> Result<EncodedAttachment, ReadError> {
    let SelectedFile {
        name,
        mime_type,
        source,
        ..
    } = file;

    let (data, size) = match source {
        ByteSource::Path(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| ReadError::Io {
                    name: name.clone(),
                    source,
                })?;
            (encode_data_url(&mime_type, &bytes), bytes.len())
        }
        ByteSource::Memory(bytes) => (encode_data_url(&mime_type, &bytes), bytes.len()),
    };

    Ok(EncodedAttachment {
        name,
        data,
        mime_type,
        size: size as u64,
    })
}

/// `data:<mime>;base64,<payload>`
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    let mime = if mime_type.is_empty() {
        FALLBACK_MIME
    } else {
        mime_type
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Inverse of [`encode_data_url`]. Returns the MIME type and the original bytes.
pub fn decode_data_url(data: &str) -> Result<(String, Vec<u8>), DataUrlError> {
    let rest = data.strip_prefix("data:").ok_or(DataUrlError::MissingPrefix)?;
    let (meta, payload) = rest.split_once(',').ok_or(DataUrlError::NotBase64)?;
    let mime = meta.strip_suffix(";base64").ok_or(DataUrlError::NotBase64)?;
    let bytes = STANDARD.decode(payload)?;
    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_every_byte_value_round_trips() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let file = SelectedFile::from_bytes("blob.bin", "application/octet-stream", bytes.clone());

        let encoded = read(file).await.unwrap();
        let (mime, decoded) = decode_data_url(&encoded.data).unwrap();

        assert_eq!(mime, "application/octet-stream");
        assert_eq!(decoded, bytes);
        assert_eq!(encoded.size, 4096);
    }

    #[tokio::test]
    async fn test_read_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all("笔记 notes\n".as_bytes()).unwrap();

        let file = SelectedFile {
            name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
            byte_size: 13,
            source: ByteSource::Path(tmp.path().to_path_buf()),
        };
        let encoded = read(file).await.unwrap();

        assert_eq!(encoded.name, "notes.txt");
        assert_eq!(encoded.mime_type, "text/plain");
        assert!(encoded.data.starts_with("data:text/plain;base64,"));
        let (_, decoded) = decode_data_url(&encoded.data).unwrap();
        assert_eq!(decoded, "笔记 notes\n".as_bytes());
    }

    #[tokio::test]
    async fn test_empty_file_and_unknown_mime() {
        let encoded = read(SelectedFile::from_bytes("empty", "", Vec::new()))
            .await
            .unwrap();
        assert_eq!(encoded.data, "data:application/octet-stream;base64,");
        assert_eq!(encoded.size, 0);
        assert_eq!(decode_data_url(&encoded.data).unwrap().1, Vec::<u8>::new());
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = SelectedFile {
            name: "gone.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            byte_size: 10,
            source: ByteSource::Path(dir.path().join("gone.pdf")),
        };

        match read(file).await {
            Err(ReadError::Io { name, .. }) => assert_eq!(name, "gone.pdf"),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(
            decode_data_url("text/plain;base64,aGk="),
            Err(DataUrlError::MissingPrefix)
        ));
        assert!(matches!(
            decode_data_url("data:text/plain,hi"),
            Err(DataUrlError::NotBase64)
        ));
        assert!(matches!(
            decode_data_url("data:text/plain;base64,@@@"),
            Err(DataUrlError::Base64(_))
        ));
    }
}
