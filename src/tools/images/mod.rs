//! Image Fetcher

pub mod types;
mod utils;

pub use types::*;
use utils::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{Result, ScrapeError};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Downloads full-resolution stills into a directory and measures them.
///
/// The client is expected to carry the browser session's cookies so gated
/// image URLs resolve for the same account.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
    dest_dir: PathBuf,
    timeout: Duration,
}

impl ImageFetcher {
    pub fn new(client: Client, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dest_dir: dest_dir.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Where the image for `shot_id` lands. Always a direct child of the
    /// destination directory.
    pub(crate) fn target_path(&self, url: &str, shot_id: &str) -> PathBuf {
        self.dest_dir.join(format!("{}{}", file_stem(shot_id), extension_for(url)))
    }

    /// Download `url` to `{dest_dir}/{shot_id}{ext}` and classify it.
    ///
    /// Never fails: an empty url or a failed download gives an empty result,
    /// an undecodable file keeps its path but has no metadata.
    pub async fn fetch(&self, url: &str, shot_id: &str) -> StoredImage {
        if url.trim().is_empty() {
            return StoredImage::empty();
        }

        let path = self.target_path(url, shot_id);
        let bytes = match self.download(url, &path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(shot_id, url, error = %e, "image download failed");
                return StoredImage::empty();
            }
        };

        let metadata = match measure(&bytes) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(shot_id, error = %e, "could not read image dimensions");
                None
            }
        };

        debug!(shot_id, path = %path.display(), "image stored");
        StoredImage {
            path: path.to_string_lossy().into_owned(),
            metadata,
        }
    }

    async fn download(&self, url: &str, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::create_dir_all(&self.dest_dir).await?;

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ScrapeError::Image(format!("empty body from {url}")));
        }

        tokio::fs::write(path, &bytes).await?;
        Ok(bytes.to_vec())
    }
}
