use crate::pixels::{BYTES_PER_PIXEL, Rgba, TileBuffer};

const SENTINEL_BYTES: [u8; BYTES_PER_PIXEL] = Rgba::SENTINEL.to_bytes();

/// Chroma-key composite of `top` over `bottom`.
///
/// Top pixels exactly equal to [`Rgba::SENTINEL`] show the bottom pixel,
/// every other top pixel wins outright. There is no alpha blending.
#[must_use]
pub fn merge(bottom: &TileBuffer, top: &TileBuffer) -> TileBuffer {
    let mut output = top.clone();
    for (out_pixel, bottom_pixel) in output
        .as_bytes_mut()
        .chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(bottom.as_bytes().chunks_exact(BYTES_PER_PIXEL))
    {
        if *out_pixel == SENTINEL_BYTES {
            out_pixel.copy_from_slice(bottom_pixel);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> TileBuffer {
        let mut tile = TileBuffer::sentinel();
        for y in 0..16 {
            for x in 0..16 {
                tile.set_pixel(x, y, Rgba::new(x as u8 * 10, y as u8 * 10, 7, 255));
            }
        }
        tile
    }

    #[test]
    fn sentinel_top_shows_bottom() {
        let bottom = gradient();
        assert_eq!(merge(&bottom, &TileBuffer::sentinel()), bottom);
    }

    #[test]
    fn opaque_top_hides_bottom() {
        let top = gradient();
        let bottom = TileBuffer::filled(Rgba::new(1, 1, 1, 255));
        assert_eq!(merge(&bottom, &top), top);
    }

    #[test]
    fn both_unset_stays_magenta() {
        let merged = merge(&TileBuffer::sentinel(), &TileBuffer::sentinel());
        assert!(merged.is_sentinel_fill());
    }

    #[test]
    fn merge_is_pointwise() {
        let bottom = gradient();
        let mut top = TileBuffer::sentinel();
        let before = merge(&bottom, &top);

        top.set_pixel(4, 9, Rgba::new(0, 0, 0, 255));
        let after = merge(&bottom, &top);

        for y in 0..16 {
            for x in 0..16 {
                if (x, y) == (4, 9) {
                    assert_eq!(after.pixel(x, y), Some(Rgba::new(0, 0, 0, 255)));
                } else {
                    assert_eq!(after.pixel(x, y), before.pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn partially_transparent_magenta_is_not_the_key() {
        let bottom = TileBuffer::filled(Rgba::new(9, 9, 9, 255));
        let top = TileBuffer::filled(Rgba::new(255, 0, 253, 128));
        assert_eq!(merge(&bottom, &top), top);
    }
}
