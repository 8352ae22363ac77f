//! Texture loading and lifetime tracking
//!
//! The subsystem decodes images, picks a GPU format from the channel count,
//! hands the pixels to a [`TextureBackend`] and remembers every id it
//! created so they can be released together on shutdown.

use std::collections::BTreeSet;
use std::path::Path;

use super::{AssetError, ImageData};

/// Handle for a GPU texture resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Pixel layout of an uploaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// Single channel
    Red,
    /// Linear RGB
    Rgb,
    /// Gamma-encoded RGB
    Srgb,
    /// Linear RGBA
    Rgba,
    /// Gamma-encoded RGBA
    SrgbAlpha,
}

impl TextureFormat {
    /// Format for a decoded image with `channels` channels
    ///
    /// `gamma` selects the sRGB variants for colour textures; single channel
    /// data is always linear.
    pub fn from_channels(channels: u8, gamma: bool) -> Result<Self, AssetError> {
        match (channels, gamma) {
            (1, _) => Ok(Self::Red),
            (3, false) => Ok(Self::Rgb),
            (3, true) => Ok(Self::Srgb),
            (4, false) => Ok(Self::Rgba),
            (4, true) => Ok(Self::SrgbAlpha),
            (other, _) => Err(AssetError::UnsupportedFormat(format!("{other} channel image"))),
        }
    }
}

/// Texture filtering modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Nearest neighbor filtering
    Nearest,
    /// Linear filtering
    Linear,
}

/// Texture wrapping modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Repeat the texture
    Repeat,
    /// Clamp to edge
    ClampToEdge,
}

/// Texture creation parameters
#[derive(Debug, Clone)]
pub struct TextureParams {
    /// Upload format
    pub format: TextureFormat,
    /// Texture filtering mode
    pub filter_mode: FilterMode,
    /// Texture wrapping mode
    pub wrap_mode: WrapMode,
    /// Generate mipmaps
    pub generate_mipmaps: bool,
    /// Texture unit to bind while uploading, if any
    pub texture_unit: Option<u32>,
}

impl TextureParams {
    /// Defaults used for model textures: linear, repeating, mipmapped
    pub fn for_format(format: TextureFormat) -> Self {
        Self {
            format,
            filter_mode: FilterMode::Linear,
            wrap_mode: WrapMode::Repeat,
            generate_mipmaps: true,
            texture_unit: None,
        }
    }
}

/// GPU side of texture management
pub trait TextureBackend {
    /// Upload pixels and return the new texture id
    fn upload(&mut self, image: &ImageData, params: &TextureParams) -> Result<TextureId, AssetError>;

    /// Release a texture
    fn delete(&mut self, id: TextureId);
}

/// Headless backend that keeps uploads in memory
#[derive(Debug, Default)]
pub struct MemoryTextureBackend {
    next_id: u32,
    live: std::collections::HashMap<TextureId, (u32, u32, TextureFormat)>,
}

impl MemoryTextureBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of textures currently alive
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Dimensions and format of a live texture
    pub fn describe(&self, id: TextureId) -> Option<(u32, u32, TextureFormat)> {
        self.live.get(&id).copied()
    }
}

impl TextureBackend for MemoryTextureBackend {
    fn upload(&mut self, image: &ImageData, params: &TextureParams) -> Result<TextureId, AssetError> {
        if image.width == 0 || image.height == 0 {
            return Err(AssetError::Backend("zero-sized texture".to_string()));
        }
        // 0 is reserved for "no texture"
        self.next_id += 1;
        let id = TextureId(self.next_id);
        self.live.insert(id, (image.width, image.height, params.format));
        Ok(id)
    }

    fn delete(&mut self, id: TextureId) {
        self.live.remove(&id);
    }
}

/// Loads textures and owns their lifetime
pub struct TextureSubsystem<B: TextureBackend = MemoryTextureBackend> {
    backend: B,
    loaded: BTreeSet<TextureId>,
}

impl Default for TextureSubsystem<MemoryTextureBackend> {
    fn default() -> Self {
        Self::new(MemoryTextureBackend::new())
    }
}

impl<B: TextureBackend> TextureSubsystem<B> {
    /// Create a subsystem on top of `backend`
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            loaded: BTreeSet::new(),
        }
    }

    /// Decode and upload a texture
    ///
    /// Failures are logged and returned; the caller decides whether a
    /// missing texture matters.
    pub fn load_texture(
        &mut self,
        path: impl AsRef<Path>,
        texture_unit: Option<u32>,
        gamma: bool,
    ) -> Result<TextureId, AssetError> {
        let path = path.as_ref();
        let result = self.try_load(path, texture_unit, gamma);
        match &result {
            Ok(id) => log::debug!("Texture {:?} loaded from {}", id, path.display()),
            Err(e) => log::error!("Failed to load texture {}: {}", path.display(), e),
        }
        result
    }

    fn try_load(&mut self, path: &Path, texture_unit: Option<u32>, gamma: bool) -> Result<TextureId, AssetError> {
        let image = ImageData::from_file(path)?;
        let format = TextureFormat::from_channels(image.channels, gamma)?;
        let params = TextureParams {
            texture_unit,
            ..TextureParams::for_format(format)
        };
        let id = self.backend.upload(&image, &params)?;
        self.loaded.insert(id);
        Ok(id)
    }

    /// Release one texture; returns false if it was not loaded here
    pub fn unload_texture(&mut self, id: TextureId) -> bool {
        let removed = self.loaded.remove(&id);
        if removed {
            self.backend.delete(id);
        }
        removed
    }

    /// Whether `id` is a texture this subsystem loaded and still owns
    pub fn is_loaded(&self, id: TextureId) -> bool {
        self.loaded.contains(&id)
    }

    /// Number of live textures
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Backend access
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Release every texture still loaded
    pub fn shutdown(&mut self) {
        let count = self.loaded.len();
        for id in std::mem::take(&mut self.loaded) {
            self.backend.delete(id);
        }
        log::info!("Texture subsystem released {} texture(s)", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_png(dir: &Path, name: &str, channels: u8) -> PathBuf {
        let path = dir.join(name);
        match channels {
            1 => image::GrayImage::from_pixel(4, 2, image::Luma([9])).save(&path),
            2 => image::GrayAlphaImage::from_pixel(4, 2, image::LumaA([9, 255])).save(&path),
            3 => image::RgbImage::from_pixel(4, 2, image::Rgb([1, 2, 3])).save(&path),
            _ => image::RgbaImage::from_pixel(4, 2, image::Rgba([1, 2, 3, 4])).save(&path),
        }
        .unwrap();
        path
    }

    #[test]
    fn test_format_follows_channel_count() {
        assert_eq!(TextureFormat::from_channels(1, true).unwrap(), TextureFormat::Red);
        assert_eq!(TextureFormat::from_channels(3, false).unwrap(), TextureFormat::Rgb);
        assert_eq!(TextureFormat::from_channels(3, true).unwrap(), TextureFormat::Srgb);
        assert_eq!(TextureFormat::from_channels(4, false).unwrap(), TextureFormat::Rgba);
        assert_eq!(TextureFormat::from_channels(4, true).unwrap(), TextureFormat::SrgbAlpha);
        assert!(TextureFormat::from_channels(2, false).is_err());
    }

    #[test]
    fn test_load_uploads_and_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let mut textures = TextureSubsystem::default();

        let rgb = textures.load_texture(write_png(dir.path(), "rgb.png", 3), Some(0), true).unwrap();
        let grey = textures.load_texture(write_png(dir.path(), "grey.png", 1), None, true).unwrap();

        assert_ne!(rgb, grey);
        assert_eq!(textures.loaded_count(), 2);
        assert_eq!(textures.backend().describe(rgb), Some((4, 2, TextureFormat::Srgb)));
        assert_eq!(textures.backend().describe(grey), Some((4, 2, TextureFormat::Red)));
    }

    #[test]
    fn test_failures_are_reported_not_tracked() {
        let dir = tempfile::tempdir().unwrap();
        let mut textures = TextureSubsystem::default();

        let missing = textures.load_texture(dir.path().join("missing.png"), None, false);
        assert!(matches!(missing, Err(AssetError::NotFound(_))));

        let two_channel = textures.load_texture(write_png(dir.path(), "la.png", 2), None, false);
        assert!(matches!(two_channel, Err(AssetError::UnsupportedFormat(_))));

        assert_eq!(textures.loaded_count(), 0);
        assert_eq!(textures.backend().live_count(), 0);
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut textures = TextureSubsystem::default();
        let first = textures.load_texture(write_png(dir.path(), "a.png", 4), None, false).unwrap();
        textures.load_texture(write_png(dir.path(), "b.png", 4), None, false).unwrap();

        assert!(textures.unload_texture(first));
        assert!(!textures.unload_texture(first));
        textures.shutdown();

        assert_eq!(textures.loaded_count(), 0);
        assert_eq!(textures.backend().live_count(), 0);
    }
}
