//! File storage abstraction for artwork images and avatars.
//!
//! The rest of the system treats storage as an opaque collaborator: it hands
//! over bytes and a key, and gets back a public URL. Only a local filesystem
//! backend is provided.

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// Metadata for a stored file.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Storage key (path relative to the storage root).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
    /// MD5 hash of the file.
    pub md5: String,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store a file under the given key.
    async fn store(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredFile>;

    /// Delete a file.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;

    /// Check if a file exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn store(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredFile> {
        let path = self.base_path.join(key);

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        let md5 = format!("{:x}", md5::compute(data));

        Ok(StoredFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.base_path.join(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone is fine
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to delete file: {e}"))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.base_path.join(key);
        Ok(tokio::fs::try_exists(&path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to stat file: {e}")))?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_joins_cleanly() {
        let storage = LocalStorage::new(PathBuf::from("/tmp/media"), "/media/".to_string());
        assert_eq!(storage.public_url("artworks/a1.png"), "/media/artworks/a1.png");

        let storage = LocalStorage::new(PathBuf::from("/tmp/media"), "/media".to_string());
        assert_eq!(storage.public_url("avatars/u1.jpg"), "/media/avatars/u1.jpg");
    }

    #[tokio::test]
    async fn test_store_and_delete_roundtrip() {
        let dir = std::env::temp_dir().join(format!("atelier-storage-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(dir.clone(), "/media".to_string());

        let stored = storage
            .store("artworks/test.png", b"png-bytes", "image/png")
            .await
            .unwrap();
        assert_eq!(stored.size, 9);
        assert_eq!(stored.content_type, "image/png");
        assert!(storage.exists("artworks/test.png").await.unwrap());

        storage.delete("artworks/test.png").await.unwrap();
        assert!(!storage.exists("artworks/test.png").await.unwrap());

        // Deleting a missing file is not an error
        storage.delete("artworks/test.png").await.unwrap();

        tokio::fs::remove_dir_all(dir).await.ok();
    }
}
