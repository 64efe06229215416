pub mod messages;
pub mod photos;
pub mod stats;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use messages::{JsonFileStore, MessageStore};
pub use photos::PhotoCatalog;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("storage corrupt at {}: {source}", path.display())]
    StorageCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no file selected")]
    EmptyFilename,
    #[error("photo {0} already exists")]
    PhotoExists(String),
    #[error("upload interrupted: {0}")]
    UploadInterrupted(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("message store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::StorageCorrupt {
            path: path.into(),
            source,
        }
    }
}
