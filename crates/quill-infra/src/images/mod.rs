//! Image host implementations.

mod disabled;

#[cfg(feature = "cloudinary")]
mod cloudinary;

pub use disabled::DisabledImageHost;

#[cfg(feature = "cloudinary")]
pub use cloudinary::{CloudinaryConfig, CloudinaryImageHost};
