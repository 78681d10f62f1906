//! Caption fetcher
//!
//! Downloads caption files into a scratch directory, memoized by
//! destination path: a non-empty file named for the URL's final path
//! segment is reused without a second transfer. Zero-byte leftovers
//! from interrupted runs are treated as absent and re-fetched.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::SessionError;

/// Downloads caption files into local scratch storage.
pub struct CaptionFetcher {
    client: reqwest::Client,
    scratch_dir: PathBuf,
}

impl CaptionFetcher {
    /// Fetcher with the default scratch directory under the cache dir.
    pub fn new() -> Self {
        let scratch_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("reelstream")
            .join("subtitles");
        Self::with_scratch_dir(scratch_dir)
    }

    /// Fetcher with a custom scratch directory (for tests).
    pub fn with_scratch_dir(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Deterministic destination for a caption URL: the scratch
    /// directory plus the URL's final path segment.
    pub fn destination(&self, url: &str) -> PathBuf {
        let filename = url
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or("caption");
        self.scratch_dir.join(filename)
    }

    /// Download a caption file, returning the local path.
    ///
    /// Idempotent per filename: when the destination already holds a
    /// non-empty file, it is returned without another transfer.
    pub async fn fetch(&self, url: &str) -> Result<PathBuf, SessionError> {
        let destination = self.destination(url);

        if is_cached(&destination) {
            debug!(path = %destination.display(), "caption already cached");
            return Ok(destination);
        }

        std::fs::create_dir_all(&self.scratch_dir)
            .map_err(|err| SessionError::DownloadFailed(err.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|err| SessionError::DownloadFailed(err.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|err| SessionError::DownloadFailed(err.to_string()))?;

        std::fs::write(&destination, &bytes)
            .map_err(|err| SessionError::DownloadFailed(err.to_string()))?;

        Ok(destination)
    }
}

impl Default for CaptionFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Present and non-empty. Zero-byte files count as absent.
fn is_cached(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}
