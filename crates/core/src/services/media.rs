//! Media service for artwork image and avatar handling.

use std::io::Cursor;
use std::sync::Arc;

use atelier_common::{AppError, AppResult, IdGenerator, StorageBackend, StoredFile};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

/// Longest allowed edge of a stored image. Larger uploads are scaled down
/// preserving aspect ratio.
pub const MAX_IMAGE_DIMENSION: u32 = 800;

/// Maximum accepted upload size in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Media service.
///
/// Decodes uploads, bounds them to [`MAX_IMAGE_DIMENSION`], and hands the
/// re-encoded bytes to the storage backend.
#[derive(Clone)]
pub struct MediaService {
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get the public URL for a storage key.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        self.storage.public_url(key)
    }

    /// Store an artwork image under `artworks/`.
    pub async fn store_artwork_image(
        &self,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<StoredFile> {
        self.store_image(data, content_type, "artworks").await
    }

    /// Store a user avatar under `avatars/`.
    pub async fn store_avatar(&self, data: &[u8], content_type: &str) -> AppResult<StoredFile> {
        self.store_image(data, content_type, "avatars").await
    }

    /// Delete a stored file.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        self.storage.delete(key).await
    }

    async fn store_image(
        &self,
        data: &[u8],
        content_type: &str,
        prefix: &str,
    ) -> AppResult<StoredFile> {
        if data.is_empty() {
            return Err(AppError::Validation("Image file is empty".to_string()));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation(format!(
                "Image exceeds maximum size of {MAX_UPLOAD_BYTES} bytes"
            )));
        }
        if !matches!(content_type, "image/jpeg" | "image/png" | "image/webp") {
            return Err(AppError::Validation(format!(
                "Unsupported image type: {content_type}"
            )));
        }

        let img = image::load_from_memory(data)
            .map_err(|e| AppError::Validation(format!("Invalid image data: {e}")))?;

        let img = bound_image(img);

        // PNG keeps its alpha channel; everything else flattens to JPEG.
        let (bytes, extension, stored_type) = if content_type == "image/png" {
            let mut buf = Vec::new();
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                .map_err(|e| AppError::Internal(format!("Failed to encode image: {e}")))?;
            (buf, "png", "image/png")
        } else {
            let mut buf = Vec::new();
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
                .map_err(|e| AppError::Internal(format!("Failed to encode image: {e}")))?;
            (buf, "jpg", "image/jpeg")
        };

        let key = format!("{prefix}/{}.{extension}", self.id_gen.generate());
        self.storage.store(&key, &bytes, stored_type).await
    }
}

/// Scale an image down so neither edge exceeds [`MAX_IMAGE_DIMENSION`].
fn bound_image(img: DynamicImage) -> DynamicImage {
    if img.width() > MAX_IMAGE_DIMENSION || img.height() > MAX_IMAGE_DIMENSION {
        img.resize(MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use atelier_common::LocalStorage;
    use std::path::PathBuf;

    fn test_service(dir: &std::path::Path) -> MediaService {
        MediaService::new(Arc::new(LocalStorage::new(
            PathBuf::from(dir),
            "/media".to_string(),
        )))
    }

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_bound_image_shrinks_oversized() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(1600, 800));
        let bounded = bound_image(img);
        assert_eq!(bounded.width(), 800);
        assert_eq!(bounded.height(), 400);
    }

    #[test]
    fn test_bound_image_keeps_small() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(640, 480));
        let bounded = bound_image(img);
        assert_eq!(bounded.width(), 640);
        assert_eq!(bounded.height(), 480);
    }

    #[tokio::test]
    async fn test_store_artwork_image_rejects_bad_type() {
        let dir = std::env::temp_dir().join(format!("atelier-media-{}", uuid::Uuid::new_v4()));
        let service = test_service(&dir);

        let result = service.store_artwork_image(b"not an image", "text/plain").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_store_artwork_image_roundtrip() {
        let dir = std::env::temp_dir().join(format!("atelier-media-{}", uuid::Uuid::new_v4()));
        let service = test_service(&dir);

        let stored = service
            .store_artwork_image(&sample_png(64, 64), "image/png")
            .await
            .unwrap();
        assert!(stored.key.starts_with("artworks/"));
        assert!(stored.key.ends_with(".png"));
        assert!(stored.url.starts_with("/media/artworks/"));

        service.delete(&stored.key).await.unwrap();
        tokio::fs::remove_dir_all(dir).await.ok();
    }
}
