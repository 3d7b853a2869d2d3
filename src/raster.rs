//! Raster representations and texture identity
//!
//! Two image representations are in play:
//! - [`image::RgbaImage`] is what the PNG codec produces and consumes.
//! - [`PixelGrid`] is the editor's working buffer: a plain row-major RGBA
//!   byte vector with its dimensions.
//!
//! Conversion between them moves the raw byte buffer, so dimensions and
//! byte layout (4 bytes per pixel, no row padding) survive unchanged.

use image::{Rgba, RgbaImage};
use std::fmt;
use thiserror::Error;

/// Bytes per RGBA pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Error type for raster conversions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// Byte buffer length does not match `width * height * 4`
    #[error("buffer of {actual} bytes does not fit a {width}x{height} RGBA image (expected {expected})")]
    BufferSize { width: u32, height: u32, expected: usize, actual: usize },
    /// Magnified canvas does not fit in memory
    #[error("a {width}x{height} image at {pixel_size}px cells is too large to render")]
    CanvasTooLarge { width: u32, height: u32, pixel_size: u32 },
}

/// Archive entry name identifying a texture, e.g. `assets/minecraft/textures/block/stone.png`.
///
/// The same string is used as the key through import, edit and export, and is
/// written back verbatim as the entry name of the exported pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TexturePath(String);

impl TexturePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the path can be written below a staging root without escaping it.
    ///
    /// Rejects absolute paths, backslashes, and empty, `.` or `..` components.
    pub fn is_safe_relative(&self) -> bool {
        let s = self.0.as_str();
        if s.is_empty() || s.starts_with('/') || s.contains('\\') || s.contains(':') {
            return false;
        }
        s.split('/').all(|part| !part.is_empty() && part != "." && part != "..")
    }
}

impl fmt::Display for TexturePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TexturePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TexturePath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Editor-side raster: row-major RGBA8 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wrap a raw RGBA byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::BufferSize`] if `data.len() != width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(RasterError::BufferSize { width, height, expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    /// Copy a codec image into a new grid.
    pub fn from_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height, data: image.as_raw().clone() }
    }

    /// Convert back into a codec image, moving the byte buffer.
    pub fn into_image(self) -> Result<RgbaImage, RasterError> {
        let expected = self.data.len();
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.data).ok_or(RasterError::BufferSize {
            width,
            height,
            expected: width as usize * height as usize * BYTES_PER_PIXEL,
            actual: expected,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
        } else {
            None
        }
    }

    /// Color at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let i = self.offset(x, y)?;
        Some(Rgba([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]))
    }

    /// Set the color at `(x, y)`. Returns `false` outside the grid.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba<u8>) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&color.0);
                true
            }
            None => false,
        }
    }
}

impl From<&RgbaImage> for PixelGrid {
    fn from(image: &RgbaImage) -> Self {
        PixelGrid::from_image(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Small xorshift generator so noise images are reproducible.
    fn noise_image(width: u32, height: u32, seed: u32) -> RgbaImage {
        let mut state = seed.max(1);
        RgbaImage::from_fn(width, height, |_, _| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            Rgba(state.to_le_bytes())
        })
    }

    #[test]
    fn test_round_trip_preserves_pixels() {
        for &(w, h) in &[(1, 1), (16, 16), (17, 23)] {
            let images = [
                RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255])),
                RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])),
                noise_image(w, h, w * 31 + h),
            ];
            for original in images {
                let grid = PixelGrid::from_image(&original);
                assert_eq!(grid.dimensions(), (w, h));
                assert_eq!(grid.as_bytes().len(), (w * h * 4) as usize);

                let back = grid.into_image().expect("grid should convert back");
                assert_eq!(back.dimensions(), original.dimensions());
                assert_eq!(back.as_raw(), original.as_raw(), "{}x{} pixels differ", w, h);
            }
        }
    }

    #[test]
    fn test_row_major_layout() {
        // 3 wide, so the stride is 12 bytes; pixel (1, 2) starts at byte 28
        let mut grid = PixelGrid::from_raw(3, 3, vec![0; 36]).unwrap();
        assert!(grid.set(1, 2, Rgba([1, 2, 3, 4])));
        assert_eq!(&grid.as_bytes()[28..32], &[1, 2, 3, 4]);

        let image = grid.into_image().unwrap();
        assert_eq!(*image.get_pixel(1, 2), Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        let err = PixelGrid::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(err, RasterError::BufferSize { width: 2, height: 2, expected: 16, actual: 15 });
    }

    #[test]
    fn test_get_set_out_of_bounds() {
        let mut grid = PixelGrid::from_raw(2, 2, vec![0; 16]).unwrap();
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);
        assert!(!grid.set(5, 5, Rgba([255, 0, 0, 255])));
        assert!(grid.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_texture_path_safety() {
        assert!(TexturePath::from("assets/mod/textures/item/gem.png").is_safe_relative());
        assert!(!TexturePath::from("assets/../../etc/passwd.png").is_safe_relative());
        assert!(!TexturePath::from("/assets/a.png").is_safe_relative());
        assert!(!TexturePath::from("assets//a.png").is_safe_relative());
        assert!(!TexturePath::from("assets\\a.png").is_safe_relative());
        assert!(!TexturePath::from("C:/assets/a.png").is_safe_relative());
        assert!(!TexturePath::from("").is_safe_relative());
    }
}
