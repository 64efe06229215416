use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, SecondsFormat};
use lovenest_types::models::{Message, NewMessage};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{Result, StoreError};

/// Ordered, append-only collection of messages.
pub trait MessageStore: Send + Sync {
    /// All messages in insertion order.
    fn list(&self) -> Result<Vec<Message>>;

    /// Assign an id and timestamp to `new`, persist it, and return the stored message.
    fn append(&self, new: NewMessage) -> Result<Message>;

    fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }
}

/// Message store backed by a single JSON array on disk.
///
/// Every append rewrites the whole file: the new contents go to a temp file in
/// the same directory which is then renamed over the original, so readers
/// never see a half-written array. Appends are serialized by `writer`; reads
/// take no lock.
pub struct JsonFileStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let dir = parent_dir(&path);
        fs::create_dir_all(dir).map_err(|e| StoreError::unavailable(dir, e))?;

        let store = Self {
            path,
            writer: Mutex::new(()),
        };

        if !store.path.exists() {
            store.write_all(&[])?;
            info!("Initialized empty message store at {}", store.path.display());
        }

        // Fail fast on a damaged file instead of on the first request.
        let count = store.read_all()?.len();
        info!(
            "Message store opened at {} ({} messages)",
            store.path.display(),
            count
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Message>> {
        let raw = fs::read(&self.path).map_err(|e| StoreError::unavailable(&self.path, e))?;
        serde_json::from_slice(&raw).map_err(|e| StoreError::corrupt(&self.path, e))
    }

    fn write_all(&self, messages: &[Message]) -> Result<()> {
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("messages.json");
        let tmp = parent_dir(&self.path).join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        let result = write_synced(&tmp, messages).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            match fs::remove_file(&tmp) {
                Ok(()) => {}
                Err(cleanup) if cleanup.kind() == io::ErrorKind::NotFound => {}
                Err(cleanup) => warn!("Failed to remove temp file {}: {}", tmp.display(), cleanup),
            }
            return Err(StoreError::unavailable(&self.path, e));
        }
        Ok(())
    }
}

impl MessageStore for JsonFileStore {
    fn list(&self) -> Result<Vec<Message>> {
        self.read_all()
    }

    fn append(&self, new: NewMessage) -> Result<Message> {
        let _guard = self.writer.lock().map_err(|_| StoreError::LockPoisoned)?;

        let mut messages = self.read_all()?;
        let id = next_id(&messages);
        let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Micros, false);
        let message = new.into_message(id, timestamp);

        messages.push(message.clone());
        self.write_all(&messages)?;

        debug!("Appended message {} ({} total)", id, messages.len());
        Ok(message)
    }
}

/// Next id is one past the highest stored id. For a file only ever written
/// through `append` this equals `len + 1`.
fn next_id(messages: &[Message]) -> u64 {
    messages.iter().map(|m| m.id).max().unwrap_or(0) + 1
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn write_synced(path: &Path, messages: &[Message]) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    serde_json::to_writer_pretty(&mut file, messages)?;
    file.sync_all()
}
