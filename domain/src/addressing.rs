use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pixels::TILE_SIZE;

/// Position of a 16x16 tile inside a tileset, both as a grid cell and as a
/// row-major linear index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileAddress {
    pub column: u32,
    pub row: u32,
    pub index: u32,
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({}, {})", self.index, self.column, self.row)
    }
}

/// Tiles per row for an image of the given pixel width. Widths under one
/// tile count as a single column so the inverse never divides by zero.
#[must_use]
pub fn tiles_per_row(tileset_width: u32) -> u32 {
    (tileset_width / TILE_SIZE).max(1)
}

/// Maps a pixel inside a tileset to the tile containing it. No bounds
/// checking happens here.
#[must_use]
pub fn pixel_to_tile(tileset_width: u32, pixel_x: u32, pixel_y: u32) -> TileAddress {
    let column = pixel_x / TILE_SIZE;
    let row = pixel_y / TILE_SIZE;
    let index = tiles_per_row(tileset_width)
        .saturating_mul(row)
        .saturating_add(column);
    TileAddress { column, row, index }
}

#[must_use]
pub fn tile_address(tileset_width: u32, index: u32) -> TileAddress {
    let per_row = tiles_per_row(tileset_width);
    TileAddress {
        column: index % per_row,
        row: index / per_row,
        index,
    }
}

/// Top-left pixel of the tile at `index`.
#[must_use]
pub fn tile_to_pixel_origin(tileset_width: u32, index: u32) -> (u32, u32) {
    let address = tile_address(tileset_width, index);
    (
        address.column.saturating_mul(TILE_SIZE),
        address.row.saturating_mul(TILE_SIZE),
    )
}

/// Scales a click on a resized rendering of an image back to image pixels.
/// A zero-sized display leaves the coordinate unscaled.
#[must_use]
pub fn display_to_image(
    display_x: f64,
    display_y: f64,
    display_size: (f64, f64),
    image_size: (u32, u32),
) -> (u32, u32) {
    let scale = |value: f64, display: f64, image: u32| -> u32 {
        let value = value.max(0.0);
        if display <= 0.0 {
            return value.floor() as u32;
        }
        (value / display * f64::from(image)).floor() as u32
    };
    (
        scale(display_x, display_size.0, image_size.0),
        scale(display_y, display_size.1, image_size.1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_is_consistent_for_all_tiles() {
        for columns in 1..=6u32 {
            for rows in 1..=4u32 {
                let width = columns * TILE_SIZE;
                for index in 0..columns * rows {
                    let (x, y) = tile_to_pixel_origin(width, index);
                    assert_eq!(pixel_to_tile(width, x, y).index, index);
                    assert_eq!(pixel_to_tile(width, x + 15, y + 15).index, index);
                }
            }
        }
    }

    #[test]
    fn pixel_inside_tile_maps_to_its_cell() {
        let address = pixel_to_tile(64, 37, 20);
        assert_eq!(
            address,
            TileAddress {
                column: 2,
                row: 1,
                index: 6
            }
        );
    }

    #[test]
    fn narrow_width_does_not_divide_by_zero() {
        assert_eq!(tile_address(8, 3), tile_address(16, 3));
        assert_eq!(tile_to_pixel_origin(0, 2), (0, 32));
    }

    #[test]
    fn display_scaling_matches_natural_size() {
        // 128px image drawn at 256px: a click at 100 lands on pixel 50.
        assert_eq!(display_to_image(100.0, 33.0, (256.0, 64.0), (128, 32)), (50, 16));
        assert_eq!(display_to_image(-4.0, 7.9, (0.0, 0.0), (128, 32)), (0, 7));
    }
}
