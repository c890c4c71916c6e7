//! Fallback image host used when no hosting credentials are configured.

use async_trait::async_trait;

use quill_core::ports::{ImageHost, ImageUpload, UploadError, UploadOptions, UploadedImage};

/// Rejects every upload. Posts without images still work.
#[derive(Debug, Default)]
pub struct DisabledImageHost;

#[async_trait]
impl ImageHost for DisabledImageHost {
    async fn upload(
        &self,
        image: ImageUpload,
        _options: &UploadOptions,
    ) -> Result<UploadedImage, UploadError> {
        tracing::warn!(file = %image.file_name, "Image upload attempted but no image host is configured");
        Err(UploadError::NotConfigured)
    }
}
