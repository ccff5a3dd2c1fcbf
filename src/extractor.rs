mod ytdlp;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{info::VideoInfo, quality::Quality, Result};

pub use ytdlp::Ytdlp;

/// Options for a download run, the counterpart of yt-dlp's `format`,
/// `outtmpl` and `noplaylist` settings.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
  pub format: String,
  pub output_template: PathBuf,
}

impl DownloadOptions {
  // files are named after the video title inside `dir`
  pub fn new(quality: Quality, dir: &Path) -> Self {
    Self {
      format: quality.format_selector(),
      output_template: dir.join("%(title)s.%(ext)s"),
    }
  }
}

/// What yt-dlp would produce for a url, resolved before downloading.
#[derive(Debug, Clone)]
pub struct Prepared {
  pub title: String,
  pub path: PathBuf,
}

#[async_trait]
pub trait Extractor: Send + Sync {
  /// Metadata only, nothing is downloaded.
  async fn fetch_info(&self, url: &str) -> Result<VideoInfo>;

  /// Resolve the title and target filename the download would use.
  async fn prepare(&self, url: &str, opts: &DownloadOptions)
    -> Result<Prepared>;

  async fn download(&self, url: &str, opts: &DownloadOptions) -> Result<()>;
}
