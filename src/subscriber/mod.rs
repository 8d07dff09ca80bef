//! Subscriber list persisted as a flat text file, one chat id per line.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use log::debug;
use log::info;
use tokio::sync::Mutex;

use crate::subscriber::error::StoreError;

pub mod error;

#[derive(Debug, PartialEq, Eq)]
pub enum SubscribeResult {
    Subscribed,
    AlreadySubscribed,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UnsubscribeResult {
    Unsubscribed,
    NotSubscribed,
}

/// Reads the subscriber file. A missing file is an empty list.
pub async fn load(path: &Path) -> Result<BTreeSet<String>, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(contents.split_whitespace().map(str::to_string).collect()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeSet::new()),
        Err(e) => Err(e.into()),
    }
}

/// Replaces the subscriber file with one id per line.
///
/// The list is written to a sibling file first and renamed over the old one, so
/// the file always holds either the previous or the new list.
pub async fn save(path: &Path, subscribers: &BTreeSet<String>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let contents = subscribers
        .iter()
        .map(String::as_str)
        .collect::<Vec<&str>>()
        .join("\n");

    let staging = staging_path(path);
    tokio::fs::write(&staging, contents).await?;
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }
    Ok(())
}

/// `subscribers.txt` is staged as `subscribers.txt.tmp` in the same directory.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// In-memory mirror of the subscriber file.
///
/// Every mutation holds the lock across the file write, so concurrent commands
/// cannot lose each other's updates.
pub struct SubscriptionStore {
    path: PathBuf,
    subscribers: Mutex<BTreeSet<String>>,
}

impl SubscriptionStore {
    /// Opens the store, loading whatever the file currently holds.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let subscribers = load(&path).await?;
        info!(
            "Loaded {} subscribers from {}",
            subscribers.len(),
            path.to_string_lossy()
        );
        Ok(Self {
            path,
            subscribers: Mutex::new(subscribers),
        })
    }

    pub async fn subscribe(&self, id: &str) -> Result<SubscribeResult, StoreError> {
        let id = Self::validate_id(id)?;
        let mut subscribers = self.subscribers.lock().await;
        if subscribers.contains(id) {
            return Ok(SubscribeResult::AlreadySubscribed);
        }

        subscribers.insert(id.to_string());
        if let Err(e) = save(&self.path, &subscribers).await {
            subscribers.remove(id);
            return Err(e);
        }
        debug!("Subscribed {id}");
        Ok(SubscribeResult::Subscribed)
    }

    pub async fn unsubscribe(&self, id: &str) -> Result<UnsubscribeResult, StoreError> {
        let mut subscribers = self.subscribers.lock().await;
        if !subscribers.remove(id.trim()) {
            return Ok(UnsubscribeResult::NotSubscribed);
        }

        if let Err(e) = save(&self.path, &subscribers).await {
            subscribers.insert(id.trim().to_string());
            return Err(e);
        }
        debug!("Unsubscribed {id}");
        Ok(UnsubscribeResult::Unsubscribed)
    }

    /// Snapshot of the current subscribers.
    pub async fn all(&self) -> Vec<String> {
        self.subscribers.lock().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.subscribers.lock().await.is_empty()
    }

    /// Ids are stored whitespace-separated, so they may not be empty or contain whitespace.
    fn validate_id(id: &str) -> Result<&str, StoreError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(StoreError::InvalidId {
                id: id.to_string(),
                reason: "id is empty".to_string(),
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(StoreError::InvalidId {
                id: id.to_string(),
                reason: "id contains whitespace".to_string(),
            });
        }
        Ok(trimmed)
    }
}
