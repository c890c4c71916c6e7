//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains database, image hosting, and token integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT token validation
//! - `cloudinary` - Image uploads to Cloudinary

pub mod database;
pub mod images;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use images::DisabledImageHost;
pub use memory::{InMemoryBlogRepository, InMemoryCategoryRepository, InMemoryUserRepository};

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};

#[cfg(feature = "cloudinary")]
pub use images::{CloudinaryConfig, CloudinaryImageHost};
