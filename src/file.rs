use axum::{
  extract::{Path, State},
  response::IntoResponse,
};
use http::{header, HeaderValue};
use tracing::info;

use crate::{AppState, Error, Result};

pub async fn get_file(
  State(state): State<AppState>,
  Path(token): Path<String>,
) -> Result<impl IntoResponse> {
  let file = state.store.get(&token).await?;
  info!("serving {} ({} bytes)", file.file_name, file.bytes.len());

  let disposition =
    HeaderValue::from_str(&content_disposition(&file.file_name))
      .map_err(|e| Error::Server(e.to_string()))?;

  let headers = [
    (header::CONTENT_TYPE, HeaderValue::from_static(file.mime_type)),
    (header::CONTENT_DISPOSITION, disposition),
  ];

  Ok((headers, file.bytes.clone()))
}

// The title goes into the filename as is. Non-ascii titles are common, so
// send an ascii fallback alongside the RFC 5987 encoded name.
fn content_disposition(file_name: &str) -> String {
  let fallback: String = file_name
    .chars()
    .map(|c| match c {
      '"' | '\\' => '_',
      c if c.is_ascii() && !c.is_ascii_control() => c,
      _ => '_',
    })
    .collect();

  format!(
    "attachment; filename=\"{}\"; filename*=UTF-8''{}",
    fallback,
    urlencoding::encode(file_name)
  )
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use bytes::Bytes;
  use http::StatusCode;

  use super::*;
  use crate::{download_store::PreparedFile, extractor::fake::FakeExtractor};

  #[test]
  fn test_content_disposition() {
    assert_eq!(
      content_disposition("Video.mp4"),
      "attachment; filename=\"Video.mp4\"; filename*=UTF-8''Video.mp4"
    );
    assert_eq!(
      content_disposition("Vídeo \"legal\".mp4"),
      "attachment; filename=\"V_deo _legal_.mp4\"; \
       filename*=UTF-8''V%C3%ADdeo%20%22legal%22.mp4"
    );
    // only unreserved characters survive unescaped
    assert_eq!(
      content_disposition("a&b (1)~.mp4"),
      "attachment; filename=\"a&b (1)~.mp4\"; \
       filename*=UTF-8''a%26b%20%281%29~.mp4"
    );
  }

  #[tokio::test]
  async fn test_get_file() {
    let root = tempfile::tempdir().unwrap();
    let state =
      AppState::with_extractor(Arc::new(FakeExtractor::default()), root.path());

    let token = state
      .store
      .insert(PreparedFile {
        file_name: "Meu Vídeo.mp4".to_string(),
        mime_type: "video/mp4",
        bytes: Bytes::from_static(b"data"),
      })
      .await
      .unwrap();

    let resp = get_file(State(state.clone()), Path(token))
      .await
      .unwrap()
      .into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "video/mp4");
    let disposition = resp.headers()[header::CONTENT_DISPOSITION]
      .to_str()
      .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"Meu V_deo.mp4\""));
  }

  #[tokio::test]
  async fn test_unknown_token() {
    let root = tempfile::tempdir().unwrap();
    let state =
      AppState::with_extractor(Arc::new(FakeExtractor::default()), root.path());

    let resp = match get_file(State(state), Path("missing".to_string())).await
    {
      Ok(_) => panic!("expected an error"),
      Err(e) => e.into_response(),
    };
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
