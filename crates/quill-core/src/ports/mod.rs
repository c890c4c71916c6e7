//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod image_host;
mod repository;

pub use auth::{AuthError, TokenClaims, TokenService};
pub use image_host::{ImageHost, ImageUpload, ResourceType, UploadError, UploadOptions, UploadedImage};
pub use repository::{BaseRepository, BlogRepository, CategoryRepository, UserRepository};
