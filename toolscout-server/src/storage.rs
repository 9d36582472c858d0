//! Image store for uploaded tool photos.
//!
//! Uploads are written to a flat directory under a generated
//! `uuid.ext` name; that name is the stable image reference stored in
//! the database and used later for display and for re-hashing during
//! match-confirmation feedback.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// File extensions kept as-is; anything else is saved as `.jpg`.
const KNOWN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Errors from the image store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested name is not a bare file name
    #[error("Invalid image reference: {0}")]
    InvalidReference(String),

    /// The referenced image does not exist
    #[error("Image not found: {0}")]
    NotFound(String),

    /// Filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Disk-backed store for uploaded photos.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Persist uploaded bytes and return the generated file name.
    ///
    /// The extension is taken from the client's file name when it is
    /// one of the known image extensions, defaulting to `.jpg`.
    pub async fn save(&self, original_name: Option<&str>, data: &[u8]) -> Result<String, StorageError> {
        let ext = original_name
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .filter(|e| KNOWN_EXTENSIONS.contains(&e.as_str()))
            .unwrap_or_else(|| "jpg".to_string());

        let name = format!("{}.{}", Uuid::new_v4().simple(), ext);
        let path = self.root.join(&name);
        tokio::fs::write(&path, data).await?;

        tracing::debug!(file = %name, bytes = data.len(), "stored uploaded image");
        Ok(name)
    }

    /// Read back a stored image by the name [`save`] returned.
    ///
    /// Only bare file names are accepted; anything containing a path
    /// separator or parent reference is rejected.
    ///
    /// [`save`]: ImageStore::save
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(name)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored image. Missing files are not an error: the
    /// database row is authoritative and file cleanup is best-effort.
    pub async fn remove(&self, name: &str) -> Result<(), StorageError> {
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(StorageError::InvalidReference(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}
