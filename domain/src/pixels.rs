use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DomainError, DomainResult};

/// Edge length of a tile in pixels.
pub const TILE_SIZE: u32 = 16;
pub const BYTES_PER_PIXEL: usize = 4;
pub const TILE_PIXELS: usize = (TILE_SIZE * TILE_SIZE) as usize;
pub const TILE_ROW_BYTES: usize = TILE_SIZE as usize * BYTES_PER_PIXEL;
pub const TILE_BYTES: usize = TILE_PIXELS * BYTES_PER_PIXEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Chroma key marking a transparent pixel in a top layer (#FF00FD, opaque).
    pub const SENTINEL: Self = Self::new(255, 0, 253, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; BYTES_PER_PIXEL] {
        [self.r, self.g, self.b, self.a]
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; BYTES_PER_PIXEL]) -> Self {
        let [r, g, b, a] = bytes;
        Self::new(r, g, b, a)
    }

    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// A 16x16 RGBA8 tile, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct TileBuffer {
    bytes: Box<[u8; TILE_BYTES]>,
}

impl TileBuffer {
    #[must_use]
    pub fn filled(color: Rgba) -> Self {
        let mut bytes = Box::new([0u8; TILE_BYTES]);
        let pixel = color.to_bytes();
        for chunk in bytes.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&pixel);
        }
        Self { bytes }
    }

    /// Placeholder used for unset layers.
    #[must_use]
    pub fn sentinel() -> Self {
        Self::filled(Rgba::SENTINEL)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.bytes.as_mut_slice()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes.chunks_exact(TILE_ROW_BYTES)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        self.bytes.chunks_exact_mut(TILE_ROW_BYTES)
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgba> + '_ {
        self.bytes.chunks_exact(BYTES_PER_PIXEL).map(|chunk| {
            let mut pixel = [0u8; BYTES_PER_PIXEL];
            pixel.copy_from_slice(chunk);
            Rgba::from_bytes(pixel)
        })
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let offset = Self::offset(x, y)?;
        let chunk = self.bytes.get(offset..offset + BYTES_PER_PIXEL)?;
        let mut pixel = [0u8; BYTES_PER_PIXEL];
        pixel.copy_from_slice(chunk);
        Some(Rgba::from_bytes(pixel))
    }

    /// Returns `false` when `(x, y)` lies outside the tile.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) -> bool {
        let Some(offset) = Self::offset(x, y) else {
            return false;
        };
        match self.bytes.get_mut(offset..offset + BYTES_PER_PIXEL) {
            Some(chunk) => {
                chunk.copy_from_slice(&color.to_bytes());
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_sentinel_fill(&self) -> bool {
        self.pixels().all(Rgba::is_sentinel)
    }

    #[must_use]
    pub fn to_image(&self) -> PixelImage {
        PixelImage {
            width: TILE_SIZE,
            height: TILE_SIZE,
            data: self.bytes.to_vec(),
        }
    }

    fn offset(x: u32, y: u32) -> Option<usize> {
        if x >= TILE_SIZE || y >= TILE_SIZE {
            return None;
        }
        Some((y as usize * TILE_SIZE as usize + x as usize) * BYTES_PER_PIXEL)
    }
}

impl Default for TileBuffer {
    fn default() -> Self {
        Self::sentinel()
    }
}

impl fmt::Debug for TileBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileBuffer")
            .field("sentinel_fill", &self.is_sentinel_fill())
            .finish_non_exhaustive()
    }
}

/// A decoded RGBA8 image, row-major with no padding between rows.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelImage {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> DomainResult<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(DomainError::InvalidPixelBuffer {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let pixel = color.to_bytes();
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * BYTES_PER_PIXEL);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn row_stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Mutable view of `len` bytes of row `y`, starting at pixel column `x`.
    pub fn row_span_mut(&mut self, x: u32, y: u32, len: usize) -> Option<&mut [u8]> {
        let start = y as usize * self.row_stride() + x as usize * BYTES_PER_PIXEL;
        self.data.get_mut(start..start + len)
    }

    /// View of `len` bytes of row `y`, starting at pixel column `x`.
    #[must_use]
    pub fn row_span(&self, x: u32, y: u32, len: usize) -> Option<&[u8]> {
        let start = y as usize * self.row_stride() + x as usize * BYTES_PER_PIXEL;
        self.data.get(start..start + len)
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let chunk = self.row_span(x, y, BYTES_PER_PIXEL)?;
        let mut pixel = [0u8; BYTES_PER_PIXEL];
        pixel.copy_from_slice(chunk);
        Some(Rgba::from_bytes(pixel))
    }
}

impl fmt::Debug for PixelImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_matches_chroma_key() {
        assert_eq!(Rgba::SENTINEL.to_bytes(), [0xFF, 0x00, 0xFD, 0xFF]);
        assert_eq!(Rgba::SENTINEL.to_string(), "#FF00FDFF");
    }

    #[test]
    fn default_tile_is_sentinel_filled() {
        let tile = TileBuffer::default();
        assert!(tile.is_sentinel_fill());
        assert_eq!(tile.pixels().count(), TILE_PIXELS);
    }

    #[test]
    fn set_pixel_outside_tile_is_rejected() {
        let mut tile = TileBuffer::sentinel();
        assert!(!tile.set_pixel(16, 0, Rgba::new(0, 0, 0, 255)));
        assert!(tile.set_pixel(15, 15, Rgba::new(1, 2, 3, 4)));
        assert_eq!(tile.pixel(15, 15), Some(Rgba::new(1, 2, 3, 4)));
        assert!(!tile.is_sentinel_fill());
    }

    #[test]
    fn image_requires_exact_buffer_length() {
        assert!(PixelImage::new(2, 2, vec![0; 16]).is_ok());
        assert!(PixelImage::new(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn image_pixel_reads_row_major() {
        let mut image = PixelImage::filled(32, 16, Rgba::new(0, 0, 0, 255));
        let span = image.row_span_mut(17, 3, BYTES_PER_PIXEL).unwrap();
        span.copy_from_slice(&[9, 8, 7, 6]);
        assert_eq!(image.pixel(17, 3), Some(Rgba::new(9, 8, 7, 6)));
        assert_eq!(image.pixel(32, 0), None);
    }
}
