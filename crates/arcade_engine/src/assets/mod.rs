//! Asset management system
//!
//! Image decoding and texture upload. GPU work goes through a
//! [`TextureBackend`] so loading can run headless.

pub mod image_loader;
pub mod texture_subsystem;

pub use image_loader::ImageData;
pub use texture_subsystem::{
    FilterMode, MemoryTextureBackend, TextureBackend, TextureFormat, TextureId, TextureParams,
    TextureSubsystem, WrapMode,
};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Unsupported asset format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The texture backend refused the upload
    #[error("Texture backend error: {0}")]
    Backend(String),
}
