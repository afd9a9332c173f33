use image::{ImageBuffer, ImageFormat, Rgba};
use png::{BitDepth, ColorType, Decoder, Encoder};
use std::io::Cursor;
use tracing::{debug, instrument};

use domain::{compile::IndexedImage, palette::Palette, pixels::PixelImage};
use metatile_application::{
    error::{AppError, AppResult},
    ports::outgoing::image_codec::ImageCodecPort,
};

/// Decodes uploads in any format the `image` crate can sniff and writes PNG.
/// Indexed PNG palettes go through the `png` crate directly, which the
/// `image` crate does not expose.
#[derive(Clone, Copy, Default)]
pub struct ImagePngAdapter;

impl ImagePngAdapter {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    fn decode_rgba_impl(&self, bytes: &[u8]) -> AppResult<PixelImage> {
        let decoded = image::load_from_memory(bytes).map_err(|e| AppError::ValidationError {
            message: format!("Unsupported or corrupt image: {}", e),
        })?;

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!("Decoded image: {} bytes -> {}x{}", bytes.len(), width, height);

        Ok(PixelImage::new(width, height, rgba.into_raw())?)
    }

    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    fn encode_png_impl(&self, image: &PixelImage) -> AppResult<Vec<u8>> {
        let buffer = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(
            image.width(),
            image.height(),
            image.as_bytes().to_vec(),
        )
        .ok_or_else(|| AppError::CodecError {
            message: "Failed to create image buffer from RGBA data".to_string(),
        })?;

        let mut png_bytes = Vec::new();
        buffer
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| AppError::CodecError {
                message: format!("Failed to encode PNG: {}", e),
            })?;

        debug!("Encoded PNG: {} bytes", png_bytes.len());
        Ok(png_bytes)
    }

    fn read_palette_impl(&self, bytes: &[u8]) -> Option<Palette> {
        let reader = Decoder::new(Cursor::new(bytes)).read_info().ok()?;
        let info = reader.info();
        if info.color_type != ColorType::Indexed {
            return None;
        }
        let palette = info.palette.as_deref().map(Palette::from_rgb_triplets);
        debug!(found = palette.is_some(), "Read indexed PNG palette");
        palette
    }

    #[instrument(skip(self, image, palette), fields(width = image.width(), height = image.height()))]
    fn encode_indexed_png_impl(&self, image: &IndexedImage, palette: &Palette) -> AppResult<Vec<u8>> {
        let codec_error = |e: png::EncodingError| AppError::CodecError {
            message: format!("Failed to encode indexed PNG: {}", e),
        };

        let mut png_bytes = Vec::new();
        let mut encoder = Encoder::new(&mut png_bytes, image.width(), image.height());
        encoder.set_color(ColorType::Indexed);
        encoder.set_depth(BitDepth::Four);
        encoder.set_palette(palette.to_plte_bytes());

        let mut writer = encoder.write_header().map_err(codec_error)?;
        writer
            .write_image_data(&image.pack_4bpp())
            .map_err(codec_error)?;
        writer.finish().map_err(codec_error)?;

        debug!("Encoded indexed PNG: {} bytes", png_bytes.len());
        Ok(png_bytes)
    }
}

impl ImageCodecPort for ImagePngAdapter {
    fn decode_rgba(&self, bytes: &[u8]) -> AppResult<PixelImage> {
        self.decode_rgba_impl(bytes)
    }

    fn encode_png(&self, image: &PixelImage) -> AppResult<Vec<u8>> {
        self.encode_png_impl(image)
    }

    fn read_palette(&self, bytes: &[u8]) -> AppResult<Option<Palette>> {
        Ok(self.read_palette_impl(bytes))
    }

    fn encode_indexed_png(&self, image: &IndexedImage, palette: &Palette) -> AppResult<Vec<u8>> {
        self.encode_indexed_png_impl(image, palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::pixels::{Rgba as Pixel, TileBuffer};

    #[test]
    fn png_keeps_exact_sentinel_pixels() {
        let mut tile = TileBuffer::sentinel();
        tile.set_pixel(3, 5, Pixel::new(12, 34, 56, 78));
        let codec = ImagePngAdapter::new();

        let png = codec.encode_png(&tile.to_image()).unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));

        let decoded = codec.decode_rgba(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
        assert_eq!(decoded.pixel(0, 0), Some(Pixel::SENTINEL));
        assert_eq!(decoded.pixel(3, 5), Some(Pixel::new(12, 34, 56, 78)));
    }

    #[test]
    fn indexed_png_keeps_palette_and_indices() {
        let codec = ImagePngAdapter::new();
        let palette = Palette::from_rgb_triplets(&[255, 0, 253, 10, 20, 30, 200, 100, 50]);
        let indices = (0..16 * 8).map(|i| (i % 3) as u8).collect();
        let image = IndexedImage::new(16, 8, indices).unwrap();

        let png = codec.encode_indexed_png(&image, &palette).unwrap();

        assert_eq!(codec.read_palette(&png).unwrap(), Some(palette));
        let decoded = codec.decode_rgba(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
        assert_eq!(decoded.pixel(0, 0), Some(Pixel::SENTINEL));
        assert_eq!(decoded.pixel(1, 0), Some(Pixel::new(10, 20, 30, 255)));
        assert_eq!(decoded.pixel(2, 0), Some(Pixel::new(200, 100, 50, 255)));
    }

    #[test]
    fn truecolor_and_foreign_images_have_no_palette() {
        let codec = ImagePngAdapter::new();
        let rgba = codec.encode_png(&TileBuffer::sentinel().to_image()).unwrap();
        assert_eq!(codec.read_palette(&rgba).unwrap(), None);
        assert_eq!(codec.read_palette(b"not a png").unwrap(), None);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let error = ImagePngAdapter::new()
            .decode_rgba(b"definitely not an image")
            .unwrap_err();
        assert!(matches!(error, AppError::ValidationError { .. }));
    }
}
