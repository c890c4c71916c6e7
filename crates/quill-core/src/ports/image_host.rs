//! Image hosting port - abstraction over the third-party asset host.

use async_trait::async_trait;

/// A file received from a client, ready to be handed to the host.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// How the host should classify the uploaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceType {
    /// Let the host detect the type from the content.
    #[default]
    Auto,
    Image,
}

impl ResourceType {
    /// Parse a configured value; anything other than "image" means `Auto`.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("image") {
            ResourceType::Image
        } else {
            ResourceType::Auto
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Auto => "auto",
            ResourceType::Image => "image",
        }
    }
}

/// Where and how an upload is stored.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Logical folder on the host.
    pub folder: String,
    pub resource_type: ResourceType,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            folder: "GBlog".to_string(),
            resource_type: ResourceType::Auto,
        }
    }
}

/// A stored asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Durable HTTPS URL of the asset.
    pub secure_url: String,
    pub public_id: String,
}

/// Image host trait.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload a file and return its durable URL.
    async fn upload(
        &self,
        image: ImageUpload,
        options: &UploadOptions,
    ) -> Result<UploadedImage, UploadError>;
}

/// Upload errors.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Image hosting is not configured")]
    NotConfigured,

    #[error("Host request failed: {0}")]
    Transport(String),

    #[error("Host rejected upload: {0}")]
    Rejected(String),

    #[error("Unreadable upload: {0}")]
    Io(String),
}
