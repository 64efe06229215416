use std::io;
use std::path::{Path, PathBuf};
use std::pin::pin;

use bytes::Bytes;
use chrono::{Local, NaiveDateTime};
use futures_util::{Stream, StreamExt};
use lovenest_types::models::Photo;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::{Result, StoreError};

/// Extensions (compared case-insensitively) that make a file a photo.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Photos are whatever image files sit in the upload directory; the directory
/// listing is the only index.
pub struct PhotoCatalog {
    dir: PathBuf,
}

impl PhotoCatalog {
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::unavailable(&dir, e))?;
        info!("Photo upload directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Image files in the upload directory, sorted by filename (which, for
    /// uploads, is upload order thanks to the timestamp prefix).
    pub async fn list(&self) -> Result<Vec<Photo>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| StoreError::unavailable(&self.dir, e))?;

        let mut photos = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::unavailable(&self.dir, e))?
        {
            if let Some(name) = entry.file_name().to_str() {
                if is_image(name) {
                    photos.push(Photo::from_filename(name));
                }
            }
        }
        photos.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(photos)
    }

    pub async fn count(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }

    /// Stream an upload to disk under a timestamp-prefixed name.
    pub async fn store<S, E>(&self, original: &str, chunks: S) -> Result<Photo>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        self.store_at(original, Local::now().naive_local(), chunks)
            .await
    }

    /// Same as [`store`](Self::store) with an explicit upload time.
    ///
    /// Never overwrites: two uploads of the same original name within the
    /// same second fail with [`StoreError::PhotoExists`].
    pub async fn store_at<S, E>(&self, original: &str, at: NaiveDateTime, chunks: S) -> Result<Photo>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let filename = stored_filename(original, at)?;
        let path = self.dir.join(&filename);

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::PhotoExists(filename));
            }
            Err(e) => return Err(StoreError::unavailable(&path, e)),
        };

        match write_stream(&mut file, &path, chunks).await {
            Ok(written) => {
                info!("Stored photo {} ({} bytes)", filename, written);
                Ok(Photo::from_filename(filename))
            }
            Err(e) => {
                drop(file);
                remove_partial(&path).await;
                Err(e)
            }
        }
    }
}

/// `<YYYYMMDD_HHMMSS>_<name>`, where `name` is the last path component of the
/// client-supplied filename.
pub fn stored_filename(original: &str, at: NaiveDateTime) -> Result<String> {
    let name = base_name(original).ok_or(StoreError::EmptyFilename)?;
    Ok(format!("{}_{}", at.format("%Y%m%d_%H%M%S"), name))
}

pub fn is_image(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

fn base_name(original: &str) -> Option<&str> {
    match original.rsplit(['/', '\\']).next() {
        None | Some("" | "." | "..") => None,
        Some(name) => Some(name),
    }
}

async fn write_stream<S, E>(file: &mut fs::File, path: &Path, chunks: S) -> Result<u64>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut chunks = pin!(chunks);
    let mut written: u64 = 0;
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(|e| StoreError::UploadInterrupted(e.into()))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| StoreError::unavailable(path, e))?;
        written += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| StoreError::unavailable(path, e))?;
    Ok(written)
}

async fn remove_partial(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => warn!("Removed partial upload {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial upload {}: {}", path.display(), e),
    }
}
