use crate::{
    addressing::tile_address,
    error::{DomainError, DomainResult},
    pixels::{PixelImage, TILE_ROW_BYTES, TILE_SIZE, TileBuffer},
};

/// Copies the 16x16 tile at grid cell `(column, row)` out of `image`.
///
/// Pixels are copied byte for byte, one 64-byte row slice at a time. A tile
/// that would reach past the right or bottom edge is an error; nothing is
/// clamped.
pub fn extract_tile(image: &PixelImage, column: u32, row: u32) -> DomainResult<TileBuffer> {
    let out_of_bounds = || DomainError::TileOutOfImageBounds {
        column,
        row,
        width: image.width(),
        height: image.height(),
    };

    let origin_x = u64::from(column) * u64::from(TILE_SIZE);
    let origin_y = u64::from(row) * u64::from(TILE_SIZE);
    if origin_x + u64::from(TILE_SIZE) > u64::from(image.width())
        || origin_y + u64::from(TILE_SIZE) > u64::from(image.height())
    {
        return Err(out_of_bounds());
    }

    let origin_x = origin_x as u32;
    let origin_y = origin_y as u32;
    let mut tile = TileBuffer::sentinel();
    for (y, dest_row) in (0..TILE_SIZE).zip(tile.rows_mut()) {
        let source_row = image
            .row_span(origin_x, origin_y + y, TILE_ROW_BYTES)
            .ok_or_else(out_of_bounds)?;
        dest_row.copy_from_slice(source_row);
    }

    Ok(tile)
}

/// Extracts the tile at row-major `index`, addressed against the image width.
pub fn extract_tile_at(image: &PixelImage, index: u32) -> DomainResult<TileBuffer> {
    let address = tile_address(image.width(), index);
    extract_tile(image, address.column, address.row)
}
