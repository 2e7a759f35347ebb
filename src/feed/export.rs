use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::types::Feed;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not write JSON file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not read JSON file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not encode feed as JSON: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Malformed JSON file {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Pretty-prints a value as JSON indented by four spaces.
///
/// Non-ASCII text is written as-is, not `\u`-escaped.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Writes the feed as `[channel, entry, ...]` to `path`, replacing any
/// previous export. The parent directory must already exist.
pub async fn write_json(feed: &Feed, path: &Path) -> Result<(), ExportError> {
    let json = to_pretty_json(feed).map_err(ExportError::Encode)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(path = %path.display(), entries = feed.entries.len(), "All entries saved in a JSON file");
    Ok(())
}

/// Loads a feed previously written by [`write_json`].
pub async fn read_json(path: &Path) -> Result<Feed, ExportError> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| ExportError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_slice(&content).map_err(|source| ExportError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
