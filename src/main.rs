use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{response::IntoResponse, routing::get, Router};
use tokio_graceful_shutdown::{SubsystemBuilder, SubsystemHandle, Toplevel};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod download;
mod download_store;
mod error;
mod extractor;
mod file;
mod form;
mod info;
mod page;
mod quality;

pub use error::{Error, Result};

use config::Config;
use download::Downloader;
use download_store::{DownloadStore, DownloadStoreRef};
use extractor::{Extractor, Ytdlp};

const DEFAULT_LOG_FILTER: &str = "youtube_downloader_hd=info";

/// Shared by all requests. Everything request specific travels in the
/// handler arguments instead.
#[derive(Clone)]
pub struct AppState {
  pub extractor: Arc<dyn Extractor>,
  pub downloader: Arc<Downloader>,
  pub store: DownloadStoreRef,
}

impl AppState {
  pub fn new(config: &Config) -> Self {
    let extractor = Arc::new(Ytdlp::new(config.ytdlp.clone()));
    Self::build(
      extractor,
      config.temp_root.clone(),
      config.download_ttl,
      config.store_capacity,
    )
  }

  fn build(
    extractor: Arc<dyn Extractor>,
    temp_root: Option<PathBuf>,
    ttl: Duration,
    capacity: usize,
  ) -> Self {
    let downloader = Downloader::new(extractor.clone(), temp_root);
    let store = DownloadStore::new(ttl, capacity).spawn();

    Self {
      extractor,
      downloader: Arc::new(downloader),
      store,
    }
  }

  #[cfg(test)]
  pub fn with_extractor(
    extractor: Arc<dyn Extractor>,
    temp_root: &std::path::Path,
  ) -> Self {
    Self::build(
      extractor,
      Some(temp_root.to_owned()),
      Duration::from_secs(60),
      10,
    )
  }
}

fn router(state: AppState) -> Router {
  Router::new()
    .route("/", get(form::homepage).post(form::submit))
    .route("/health", get(health))
    .route("/file/:token", get(file::get_file))
    .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    )
    .init();

  let config = Config::from_env()?;

  Toplevel::new(move |s| async move {
    s.start(SubsystemBuilder::new("http", move |subsys| {
      serve(config, subsys)
    }));
  })
  .catch_signals()
  .handle_shutdown_requests(Duration::from_secs(1))
  .await
  .map_err(|e| Error::Server(e.to_string()))
}

async fn serve(config: Config, subsys: SubsystemHandle) -> Result<()> {
  let app = router(AppState::new(&config));

  info!("Listening on {}", config.bind_addr);

  axum::Server::try_bind(&config.bind_addr)
    .map_err(|e| Error::Server(e.to_string()))?
    .serve(app.into_make_service())
    .with_graceful_shutdown(subsys.on_shutdown_requested())
    .await
    .map_err(|e| Error::Server(e.to_string()))?;

  info!("server stopped");
  Ok(())
}

async fn health() -> impl IntoResponse {
  "ok".to_owned()
}
