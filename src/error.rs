use std::path::PathBuf;

use axum::response::{IntoResponse, Response};
use http::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("IO error: {0}")]
  IO(#[from] std::io::Error),

  #[error("failed to parse yt-dlp output: {0}")]
  Json(#[from] serde_json::Error),

  #[error("{0}")]
  Ytdlp(String),

  #[error("downloaded file not found: {}", .0.display())]
  MissingFile(PathBuf),

  #[error("download store is not running")]
  StoreUnavailable,

  #[error("file not found or expired: {0}")]
  FileNotFound(String),

  #[error("invalid configuration: {0}")]
  Config(String),

  #[error("server error: {0}")]
  Server(String),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::FileNotFound(_) => {
        (StatusCode::NOT_FOUND, self.to_string()).into_response()
      }
      err => {
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
      }
    }
  }
}
