use std::{net::SocketAddr, path::PathBuf, time::Duration};

use crate::{Error, Result};

// YouTube blocks the default yt-dlp agent from time to time. This is the
// header that worked when the app was written; override with
// YTDLP_USER_AGENT when it stops working.
pub const DEFAULT_USER_AGENT: &str =
  "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
  AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.5060.134 Safari/537.36";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_YTDLP_PATH: &str = "yt-dlp";
// expire after 10 minutes
const DEFAULT_TTL_SECS: u64 = 10 * 60;
// store up to 30 files
const DEFAULT_STORE_CAPACITY: usize = 30;

#[derive(Debug, Clone)]
pub struct Config {
  pub bind_addr: SocketAddr,
  pub ytdlp: YtdlpConfig,
  pub temp_root: Option<PathBuf>,
  pub download_ttl: Duration,
  pub store_capacity: usize,
}

#[derive(Debug, Clone)]
pub struct YtdlpConfig {
  pub program: PathBuf,
  pub user_agent: String,
  pub proxy: Option<String>,
}

impl Default for YtdlpConfig {
  fn default() -> Self {
    Self {
      program: PathBuf::from(DEFAULT_YTDLP_PATH),
      user_agent: DEFAULT_USER_AGENT.to_string(),
      proxy: None,
    }
  }
}

impl Config {
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let bind_addr = var("BIND_ADDR")
      .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
      .parse::<SocketAddr>()
      .map_err(|e| Error::Config(format!("BIND_ADDR: {e}")))?;

    let ytdlp = YtdlpConfig {
      program: var("YTDLP_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_YTDLP_PATH)),
      user_agent: var("YTDLP_USER_AGENT")
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
      proxy: var("YTDLP_PROXY"),
    };

    let ttl_secs = parse_number(var("DOWNLOAD_TTL_SECS"), "DOWNLOAD_TTL_SECS")?
      .unwrap_or(DEFAULT_TTL_SECS);
    let store_capacity =
      parse_number(var("DOWNLOAD_STORE_CAPACITY"), "DOWNLOAD_STORE_CAPACITY")?
        .unwrap_or(DEFAULT_STORE_CAPACITY);
    if store_capacity == 0 {
      return Err(Error::Config(
        "DOWNLOAD_STORE_CAPACITY must be at least 1".into(),
      ));
    }

    Ok(Self {
      bind_addr,
      ytdlp,
      temp_root: var("DOWNLOAD_TEMP_DIR").map(PathBuf::from),
      download_ttl: Duration::from_secs(ttl_secs),
      store_capacity,
    })
  }
}

fn parse_number<T>(value: Option<String>, key: &str) -> Result<Option<T>>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  value
    .map(|v| {
      v.trim()
        .parse::<T>()
        .map_err(|e| Error::Config(format!("{key}: {e}")))
    })
    .transpose()
}
