use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use bytes::Bytes;
use tempfile::TempDir;
use tracing::{info, warn};

use crate::{
  extractor::{DownloadOptions, Extractor},
  quality::Quality,
  Error, Result,
};

pub const VIDEO_MIME_TYPE: &str = "video/mp4";

#[derive(Debug, Clone)]
pub struct DownloadedVideo {
  pub title: String,
  pub file_name: String,
  pub bytes: Bytes,
}

/// A failed download, reduced to what the page can tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadFailure {
  /// private, removed or otherwise unavailable video
  Unavailable,
  /// nothing matched the format selector
  NoFormats,
  Other(String),
}

impl DownloadFailure {
  pub fn classify(message: &str) -> Self {
    if message.contains("Video unavailable") {
      DownloadFailure::Unavailable
    } else if message.contains("No video formats") {
      DownloadFailure::NoFormats
    } else {
      DownloadFailure::Other(message.to_string())
    }
  }
}

impl From<Error> for DownloadFailure {
  fn from(err: Error) -> Self {
    Self::classify(&err.to_string())
  }
}

/// Runs a single download inside its own temp directory and hands back the
/// bytes. Nothing is left on disk once `download` returns.
pub struct Downloader {
  extractor: Arc<dyn Extractor>,
  temp_root: Option<PathBuf>,
}

impl Downloader {
  pub fn new(
    extractor: Arc<dyn Extractor>,
    temp_root: Option<PathBuf>,
  ) -> Self {
    Self {
      extractor,
      temp_root,
    }
  }

  pub async fn download(
    &self,
    url: &str,
    quality: Quality,
  ) -> Result<DownloadedVideo, DownloadFailure> {
    self.try_download(url, quality).await.map_err(|e| {
      warn!("download of {} failed: {}", url, e);
      e.into()
    })
  }

  async fn try_download(
    &self,
    url: &str,
    quality: Quality,
  ) -> Result<DownloadedVideo> {
    let temp_dir = self.temp_dir().await?;
    let opts = DownloadOptions::new(quality, temp_dir.path());

    // resolve the filename first, the same options decide where the file
    // ends up during the actual download
    let prepared = self.extractor.prepare(url, &opts).await?;
    self.extractor.download(url, &opts).await?;

    if !prepared.path.exists() {
      return Err(Error::MissingFile(prepared.path));
    }

    let bytes = tokio::fs::read(&prepared.path).await?;
    info!(
      "downloaded {} ({} bytes) from {}",
      prepared.title,
      bytes.len(),
      url
    );

    cleanup(&prepared.path, temp_dir).await;

    Ok(DownloadedVideo {
      file_name: format!("{}.mp4", prepared.title),
      title: prepared.title,
      bytes: Bytes::from(bytes),
    })
  }

  async fn temp_dir(&self) -> Result<TempDir> {
    if let Some(root) = &self.temp_root {
      tokio::fs::create_dir_all(root).await?;
    }

    let root = self.temp_root.clone();
    let dir = tokio::task::spawn_blocking(move || {
      let mut builder = tempfile::Builder::new();
      builder.prefix("ytdl-");
      match root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
      }
    })
    .await
    .map_err(|e| Error::Server(e.to_string()))??;

    Ok(dir)
  }
}

// best effort, a leftover file is not worth failing the request for
async fn cleanup(file: &Path, dir: TempDir) {
  if let Err(e) = tokio::fs::remove_file(file).await {
    warn!("failed to delete file {}: {}", file.display(), e);
  }

  // TempDir would remove it synchronously on drop
  let dir = dir.keep();
  if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
    warn!("failed to delete temp dir {}: {}", dir.display(), e);
  }
}
