use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::util::sanitize_file_stem;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Flat-file cache of raw feed markup plus the JSON export files.
///
/// Layout under the cache directory:
///
/// - `<key>.xml`: last successfully fetched body for a host (see
///   [`crate::util::cache_key`])
/// - `<title>.json`: export of the last parsed feed with that channel title
///
/// Files are overwritten, never deleted. Nothing is locked, so two runs
/// against the same feed may race.
#[derive(Debug, Clone)]
pub struct FeedCache {
    dir: PathBuf,
}

impl FeedCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the raw XML cache for a cache key.
    pub fn xml_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.xml"))
    }

    /// Path of the JSON export for a channel title.
    pub fn export_path(&self, channel_title: &str) -> PathBuf {
        self.dir
            .join(format!("{}.json", sanitize_file_stem(channel_title)))
    }

    /// Creates the cache directory if needed.
    pub async fn ensure_dir(&self) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| CacheError::CreateDir {
                path: self.dir.clone(),
                source,
            })
    }

    /// Writes (or overwrites) the cached markup for `key`.
    pub async fn write(&self, key: &str, bytes: &[u8]) -> Result<PathBuf, CacheError> {
        self.ensure_dir().await?;

        let path = self.xml_path(key);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| CacheError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Feed contents cached");
        Ok(path)
    }

    /// Reads the cached markup for `key`.
    ///
    /// Returns `Ok(None)` when nothing has been cached for that key yet.
    pub async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.xml_path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                tracing::info!(path = %path.display(), "Reading from cache");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Read { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FeedCache::new(dir.path());
        assert!(cache.read("example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_creates_dir_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FeedCache::new(dir.path().join("nested").join("cache"));

        let path = cache.write("example.com", b"<rss/>").await.unwrap();
        assert_eq!(path, cache.dir().join("example.com.xml"));
        assert_eq!(
            cache.read("example.com").await.unwrap().as_deref(),
            Some(&b"<rss/>"[..])
        );
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FeedCache::new(dir.path());

        cache.write("k", b"old contents").await.unwrap();
        cache.write("k", b"new").await.unwrap();
        assert_eq!(cache.read("k").await.unwrap().unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_write_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let cache = FeedCache::new(&blocker);
        let err = cache.write("k", b"x").await.unwrap_err();
        assert!(matches!(err, CacheError::CreateDir { .. }));
    }

    #[test]
    fn test_export_path_uses_sanitized_title() {
        let cache = FeedCache::new("cache");
        assert_eq!(
            cache.export_path("World/Europe News"),
            PathBuf::from("cache").join("World_Europe News.json")
        );
    }
}
