use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use kameo::{actor::ActorRef, messages, Actor};
use lru_time_cache::LruCache;
use tracing::debug;

use crate::{Error, Result};

/// A finished download waiting for the browser to fetch it.
#[derive(Debug)]
pub struct PreparedFile {
  pub file_name: String,
  pub mime_type: &'static str,
  pub bytes: Bytes,
}

/// Finished downloads kept in memory, keyed by an unguessable token. Old
/// entries expire and the least recently used go first when full.
#[derive(Actor)]
pub struct DownloadStore {
  files: LruCache<String, Arc<PreparedFile>>,
}

#[derive(Clone)]
pub struct DownloadStoreRef(ActorRef<DownloadStore>);

#[messages]
impl DownloadStore {
  #[message]
  async fn insert(&mut self, file: PreparedFile) -> Result<String> {
    let token = new_token();
    debug!("storing {} as {}", file.file_name, token);
    self.files.insert(token.clone(), Arc::new(file));
    Ok(token)
  }

  #[message]
  async fn get(&mut self, token: String) -> Result<Option<Arc<PreparedFile>>> {
    Ok(self.files.get(&token).cloned())
  }
}

impl DownloadStore {
  pub fn new(ttl: Duration, capacity: usize) -> Self {
    let files = LruCache::with_expiry_duration_and_capacity(ttl, capacity);
    Self { files }
  }

  pub fn spawn(self) -> DownloadStoreRef {
    DownloadStoreRef(kameo::spawn(self))
  }
}

impl DownloadStoreRef {
  pub async fn insert(&self, file: PreparedFile) -> Result<String> {
    self
      .0
      .ask(Insert { file })
      .send()
      .await
      .map_err(|_| Error::StoreUnavailable)
  }

  pub async fn get(&self, token: &str) -> Result<Arc<PreparedFile>> {
    let token = token.to_string();
    self
      .0
      .ask(Get {
        token: token.clone(),
      })
      .send()
      .await
      .map_err(|_| Error::StoreUnavailable)?
      .ok_or(Error::FileNotFound(token))
  }
}

// 128 random bits, hex encoded
fn new_token() -> String {
  format!("{:032x}", rand::random::<u128>())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn file(name: &str) -> PreparedFile {
    PreparedFile {
      file_name: name.to_string(),
      mime_type: "video/mp4",
      bytes: Bytes::from_static(b"bytes"),
    }
  }

  #[test]
  fn test_new_token() {
    let a = new_token();
    let b = new_token();
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
  }

  #[tokio::test]
  async fn test_insert_and_get() {
    let store = DownloadStore::new(Duration::from_secs(60), 10).spawn();

    let token = store.insert(file("a.mp4")).await.unwrap();
    let stored = store.get(&token).await.unwrap();
    assert_eq!(stored.file_name, "a.mp4");
    assert_eq!(&stored.bytes[..], b"bytes");

    // can be fetched again until it expires
    assert!(store.get(&token).await.is_ok());

    let err = store.get("nope").await.unwrap_err();
    assert!(matches!(err, Error::FileNotFound(t) if t == "nope"));
  }

  #[tokio::test]
  async fn test_capacity_evicts_oldest() {
    let store = DownloadStore::new(Duration::from_secs(60), 2).spawn();

    let first = store.insert(file("1.mp4")).await.unwrap();
    let second = store.insert(file("2.mp4")).await.unwrap();
    let third = store.insert(file("3.mp4")).await.unwrap();

    assert!(store.get(&first).await.is_err());
    assert!(store.get(&second).await.is_ok());
    assert!(store.get(&third).await.is_ok());
  }

  #[tokio::test]
  async fn test_entries_expire() {
    let store = DownloadStore::new(Duration::from_millis(50), 10).spawn();

    let token = store.insert(file("a.mp4")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(matches!(
      store.get(&token).await,
      Err(Error::FileNotFound(_))
    ));
  }
}
