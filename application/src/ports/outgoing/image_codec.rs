use crate::error::AppResult;
use domain::{compile::IndexedImage, palette::Palette, pixels::PixelImage};
use std::sync::Arc;

pub trait ImageCodecPort: Send + Sync {
    /// Decodes any supported image format into straight RGBA8.
    fn decode_rgba(&self, bytes: &[u8]) -> AppResult<PixelImage>;
    fn encode_png(&self, image: &PixelImage) -> AppResult<Vec<u8>>;

    /// Palette of an indexed PNG, or `None` for any other image.
    fn read_palette(&self, bytes: &[u8]) -> AppResult<Option<Palette>>;
    /// Writes `image` as a 4-bit indexed PNG using `palette`.
    fn encode_indexed_png(&self, image: &IndexedImage, palette: &Palette) -> AppResult<Vec<u8>>;
}

pub type DynImageCodecPort = Arc<dyn ImageCodecPort>;
