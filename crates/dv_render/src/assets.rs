//! Image assets: decoded RGBA buffers looked up by string id.
//!
//! The game cannot run without its sprite sheets, so every load failure is an
//! error the caller propagates; there is no placeholder fallback here. Hosts
//! without image files (the headless runner, tests) use [`SyntheticAssets`],
//! which produces transparent buffers of registered sizes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image '{id}' not found at {path}")]
    Missing { id: String, path: PathBuf },
    #[error("failed to decode image '{id}': {source}")]
    Decode {
        id: String,
        #[source]
        source: image::ImageError,
    },
    #[error("no image registered for id '{0}'")]
    UnknownId(String),
    #[error("image '{id}' ({width}x{height}) cannot be sliced into {rows} rows x {cols} cols")]
    SheetGeometry {
        id: String,
        width: u32,
        height: u32,
        rows: u32,
        cols: u32,
    },
}

/// Decoded pixels, row-major RGBA8.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RawImage {
    pub fn blank(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize) * 4;
        Self {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }
}

pub trait AssetProvider {
    fn load_image(&self, id: &str) -> Result<RawImage, AssetError>;
}

/// Loads `<root>/<id>.png`.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.png"))
    }
}

impl AssetProvider for DirectoryAssets {
    fn load_image(&self, id: &str) -> Result<RawImage, AssetError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(AssetError::Missing {
                id: id.to_string(),
                path,
            });
        }
        let decoded = image::open(&path).map_err(|source| AssetError::Decode {
            id: id.to_string(),
            source,
        })?;
        let image = RawImage::from_rgba(decoded.to_rgba8());
        log::debug!(
            "Loaded image '{}' ({}x{}) from {}",
            id,
            image.width,
            image.height,
            path.display()
        );
        Ok(image)
    }
}

/// Transparent images of known sizes, for hosts without image files.
#[derive(Debug, Clone, Default)]
pub struct SyntheticAssets {
    sizes: HashMap<String, (u32, u32)>,
}

impl SyntheticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, id: &str, width: u32, height: u32) -> Self {
        self.sizes.insert(id.to_string(), (width, height));
        self
    }
}

impl AssetProvider for SyntheticAssets {
    fn load_image(&self, id: &str) -> Result<RawImage, AssetError> {
        let (width, height) = self
            .sizes
            .get(id)
            .copied()
            .ok_or_else(|| AssetError::UnknownId(id.to_string()))?;
        Ok(RawImage::blank(width, height))
    }
}
