//! Slicing source images into fixed-size frame grids.

use std::sync::Arc;

use dv_core::Rect;

use crate::assets::{AssetError, RawImage};

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    image: Arc<str>,
    rows: u32,
    cols: u32,
    frame_width: u32,
    frame_height: u32,
}

impl SpriteSheet {
    /// Split `image` into `rows x cols` equal frames. Trailing pixels that do
    /// not fill a whole frame are ignored.
    pub fn slice(id: &str, image: &RawImage, rows: u32, cols: u32) -> Result<Self, AssetError> {
        let geometry_error = || AssetError::SheetGeometry {
            id: id.to_string(),
            width: image.width,
            height: image.height,
            rows,
            cols,
        };
        if rows == 0 || cols == 0 {
            return Err(geometry_error());
        }
        let frame_width = image.width / cols;
        let frame_height = image.height / rows;
        if frame_width == 0 || frame_height == 0 {
            return Err(geometry_error());
        }
        Ok(Self {
            image: Arc::from(id),
            rows,
            cols,
            frame_width,
            frame_height,
        })
    }

    /// A single-frame sheet covering the whole image.
    pub fn whole(id: &str, image: &RawImage) -> Result<Self, AssetError> {
        Self::slice(id, image, 1, 1)
    }

    pub fn image(&self) -> &Arc<str> {
        &self.image
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn frame_width(&self) -> f64 {
        f64::from(self.frame_width)
    }

    pub fn frame_height(&self) -> f64 {
        f64::from(self.frame_height)
    }

    /// Source rectangle of the frame at (`row`, `col`), clamped into the grid.
    pub fn frame_rect(&self, row: u32, col: u32) -> Rect {
        let row = row.min(self.rows - 1);
        let col = col.min(self.cols - 1);
        Rect::from_origin_size(
            f64::from(col * self.frame_width),
            f64::from(row * self.frame_height),
            self.frame_width(),
            self.frame_height(),
        )
    }
}
