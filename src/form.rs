use axum::{extract::State, response::Html, Form};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
  download::{DownloadFailure, VIDEO_MIME_TYPE},
  download_store::PreparedFile,
  info::VideoInfo,
  page,
  quality::Quality,
  AppState,
};

const ACCEPTED_DOMAINS: [&str; 2] = ["youtube.com", "youtu.be"];

// the raw form body; an unchecked checkbox is simply absent
#[derive(Debug, Deserialize)]
pub struct DownloadForm {
  #[serde(default)]
  url: String,
  #[serde(default)]
  quality: Quality,
  show_info: Option<String>,
}

/// One form submission. Lives for the duration of a single request.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
  pub url: String,
  pub quality: Quality,
  pub show_info: bool,
}

impl Default for DownloadRequest {
  fn default() -> Self {
    Self {
      url: String::new(),
      quality: Quality::default(),
      show_info: true,
    }
  }
}

impl From<DownloadForm> for DownloadRequest {
  fn from(form: DownloadForm) -> Self {
    Self {
      url: form.url.trim().to_string(),
      quality: form.quality,
      show_info: form.show_info.is_some(),
    }
  }
}

// substring match only, yt-dlp rejects anything it cannot handle
pub fn is_supported_url(url: &str) -> bool {
  !url.is_empty() && ACCEPTED_DOMAINS.iter().any(|d| url.contains(d))
}

#[derive(Debug)]
pub enum InfoPanel {
  Hidden,
  Fetched(VideoInfo),
  // lookup failed, the download may still work
  Unavailable,
}

#[derive(Debug)]
pub struct ReadyDownload {
  pub title: String,
  pub file_name: String,
  pub token: String,
}

#[derive(Debug)]
pub enum Outcome {
  Invalid,
  Finished {
    info: InfoPanel,
    result: Result<ReadyDownload, DownloadFailure>,
  },
}

pub async fn process(req: &DownloadRequest, state: &AppState) -> Outcome {
  if !is_supported_url(&req.url) {
    return Outcome::Invalid;
  }

  let info = if req.show_info {
    match state.extractor.fetch_info(&req.url).await {
      Ok(info) => InfoPanel::Fetched(info),
      Err(e) => {
        warn!("failed to fetch info for {}: {}", req.url, e);
        InfoPanel::Unavailable
      }
    }
  } else {
    InfoPanel::Hidden
  };

  let result = match state.downloader.download(&req.url, req.quality).await {
    Ok(video) => {
      let file = PreparedFile {
        file_name: video.file_name.clone(),
        mime_type: VIDEO_MIME_TYPE,
        bytes: video.bytes,
      };

      state
        .store
        .insert(file)
        .await
        .map(|token| ReadyDownload {
          title: video.title,
          file_name: video.file_name,
          token,
        })
        .map_err(DownloadFailure::from)
    }
    Err(failure) => Err(failure),
  };

  Outcome::Finished { info, result }
}

pub async fn homepage() -> Html<String> {
  Html(page::render(&DownloadRequest::default(), None))
}

pub async fn submit(
  State(state): State<AppState>,
  Form(form): Form<DownloadForm>,
) -> Html<String> {
  let req = DownloadRequest::from(form);
  info!("download requested: {} ({:?})", req.url, req.quality);

  let outcome = process(&req, &state).await;
  Html(page::render(&req, Some(&outcome)))
}
