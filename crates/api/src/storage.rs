//! Storage for uploaded document files.
//!
//! Metadata lives in the `documents` table; bytes live behind a
//! [`FileStorage`]. Stored files are addressed by their public path
//! (`/uploads/documents/{file}`).

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use maintrack_core::error::CoreError;

use crate::error::AppError;

/// Public URL prefix under which uploads are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Subdirectory for document uploads.
const DOCUMENTS_DIR: &str = "documents";

/// Multipart field name carrying the file.
pub const DOCUMENT_FIELD: &str = "document";

/// Exact MIME types accepted besides `image/*`.
const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
];

/// Whether an upload with this content type is accepted.
pub fn is_allowed_mime(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.starts_with("image/") || ALLOWED_MIME_TYPES.contains(&essence.as_str())
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Invalid stored path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnsupportedType(_) => {
                AppError::Core(CoreError::Validation(err.to_string()))
            }
            StorageError::InvalidPath(_) | StorageError::Io(_) => {
                AppError::InternalError(err.to_string())
            }
        }
    }
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persist `bytes` under a fresh unique name derived from
    /// `original_name`'s extension. Returns the public path.
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Remove a previously stored file. Missing files are not an error.
    async fn remove(&self, public_path: &str) -> Result<(), StorageError>;
}

/// [`FileStorage`] writing to a local directory.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a public path back to a location under `root`, refusing anything
    /// that would escape it.
    fn resolve(&self, public_path: &str) -> Result<PathBuf, StorageError> {
        let relative = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|p| p.strip_prefix('/'))
            .ok_or_else(|| StorageError::InvalidPath(public_path.to_string()))?;
        let relative = Path::new(relative);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(StorageError::InvalidPath(public_path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

/// `document-{millis}-{uuid}{ext}`; the extension is kept only when it is
/// plain alphanumeric.
fn unique_file_name(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();
    format!(
        "{DOCUMENT_FIELD}-{}-{}{ext}",
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple()
    )
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let dir = self.root.join(DOCUMENTS_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = unique_file_name(original_name);
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        tracing::debug!(file = %file_name, size = bytes.len(), "Stored upload");
        Ok(format!("{PUBLIC_PREFIX}/{DOCUMENTS_DIR}/{file_name}"))
    }

    async fn remove(&self, public_path: &str) -> Result<(), StorageError> {
        let path = self.resolve(public_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %public_path, "Stored file already missing");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn mime_allow_list() {
        assert!(is_allowed_mime("image/png"));
        assert!(is_allowed_mime("application/pdf"));
        assert!(is_allowed_mime("text/plain; charset=utf-8"));
        assert!(is_allowed_mime(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ));
        assert!(!is_allowed_mime("application/zip"));
        assert!(!is_allowed_mime("text/html"));
    }

    #[test]
    fn unique_names_keep_clean_extension() {
        let a = unique_file_name("Manual.PDF");
        let b = unique_file_name("Manual.PDF");
        assert!(a.starts_with("document-") && a.ends_with(".pdf"));
        assert_ne!(a, b);
        assert!(!unique_file_name("evil.p/h").contains('/'));
        assert!(!unique_file_name("noext").contains('.'));
    }

    #[tokio::test]
    async fn store_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        let public = storage.store("notes.txt", b"bearing noise").await.unwrap();
        assert!(public.starts_with("/uploads/documents/document-"));

        let on_disk = storage.resolve(&public).unwrap();
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), b"bearing noise");

        storage.remove(&public).await.unwrap();
        assert!(!on_disk.exists());
        // Second removal is a no-op.
        storage.remove(&public).await.unwrap();
    }

    #[tokio::test]
    async fn remove_refuses_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());
        assert_matches!(
            storage.remove("/uploads/../secrets").await,
            Err(StorageError::InvalidPath(_))
        );
        assert_matches!(storage.remove("/etc/passwd").await, Err(StorageError::InvalidPath(_)));
    }
}
