use std::{process::Stdio, sync::LazyLock};

use async_trait::async_trait;
use itertools::Itertools;
use regex::Regex;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::{config::YtdlpConfig, info::VideoInfo, Error, Result};

use super::{DownloadOptions, Extractor, Prepared};

// run yt-dlp command line for metadata and downloads.
// requires yt-dlp executable to be in PATH, or YTDLP_PATH to point at it.
pub struct Ytdlp {
  config: YtdlpConfig,
}

impl Ytdlp {
  pub fn new(config: YtdlpConfig) -> Self {
    Self { config }
  }

  // flags shared by every invocation: quiet, no warnings, no playlists and
  // the browser user agent.
  fn command(&self) -> Command {
    let mut cmd = Command::new(&self.config.program);

    cmd
      .arg("--quiet")
      .arg("--no-warnings")
      .arg("--no-playlist")
      .arg("--add-header")
      .arg(format!("User-Agent:{}", self.config.user_agent));

    if let Some(proxy) = &self.config.proxy {
      debug!("using proxy: {}", redact_proxy(proxy));
      cmd.arg("--proxy").arg(proxy);
    }

    cmd
  }

  fn with_download_options(cmd: &mut Command, opts: &DownloadOptions) {
    cmd
      .arg("-f")
      .arg(&opts.format)
      .arg("-o")
      .arg(&opts.output_template);
  }
}

#[async_trait]
impl Extractor for Ytdlp {
  async fn fetch_info(&self, url: &str) -> Result<VideoInfo> {
    let mut cmd = self.command();
    cmd.arg("-j").arg("--").arg(url);

    let stdout = run(cmd, url).await?;
    Ok(serde_json::from_slice(&stdout)?)
  }

  async fn prepare(
    &self,
    url: &str,
    opts: &DownloadOptions,
  ) -> Result<Prepared> {
    #[derive(Deserialize)]
    struct YtdlpOutput {
      title: Option<String>,
      #[serde(rename = "_filename")]
      filename: std::path::PathBuf,
    }

    let mut cmd = self.command();
    Self::with_download_options(&mut cmd, opts);
    cmd.arg("-j").arg("--").arg(url);

    let stdout = run(cmd, url).await?;
    let output: YtdlpOutput = serde_json::from_slice(&stdout)?;

    Ok(Prepared {
      title: output.title.unwrap_or_else(|| "video".to_string()),
      path: output.filename,
    })
  }

  async fn download(&self, url: &str, opts: &DownloadOptions) -> Result<()> {
    let mut cmd = self.command();
    Self::with_download_options(&mut cmd, opts);
    cmd.arg("--no-progress").arg("--").arg(url);

    run(cmd, url).await?;
    Ok(())
  }
}

async fn run(mut cmd: Command, url: &str) -> Result<Vec<u8>> {
  debug!("running yt-dlp for {}", url);

  let output = cmd
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .output()
    .await?;

  detect_error(&output.stderr, output.status.success())?;
  Ok(output.stdout)
}

// yt-dlp prints failures as "ERROR: ..." lines on stderr
fn detect_error(stderr: &[u8], success: bool) -> Result<()> {
  let s = String::from_utf8_lossy(stderr);
  let errors = s
    .lines()
    .filter(|line| line.starts_with("ERROR:"))
    .join("\n");

  if !errors.is_empty() {
    return Err(Error::Ytdlp(errors));
  }

  if !success {
    let message = match s.trim() {
      "" => "yt-dlp exited with an error".to_string(),
      msg => msg.to_string(),
    };
    return Err(Error::Ytdlp(message));
  }

  Ok(())
}

// used to remove cred info from proxy url before printing
fn redact_proxy(proxy: &str) -> String {
  static AUTH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^:/@]+(:[^@]+)?@").unwrap());
  AUTH_REGEX.replace(proxy, "//<REDACTED>@").into_owned()
}
