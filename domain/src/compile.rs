//! Compiles the metatile bank into hardware-ready artifacts: a deduplicated
//! sheet of 8x8 indexed tiles, one palette per referenced tileset, and a
//! binary table of tile entries per metatile.
//!
//! Each 16x16 layer is split into four 8x8 tiles in the order top-left,
//! top-right, bottom-left, bottom-right. Every tile becomes a little-endian
//! `u16` entry: palette in bits 12-15, vertical flip in bit 11, horizontal
//! flip in bit 10 and the tile id in bits 0-9. A slot contributes its bottom
//! layer's four entries followed by its top layer's.

use serde::Serialize;
use std::collections::HashSet;

use crate::{
    error::{DomainError, DomainResult},
    metatile::{LayerState, MetatileStore, SLOT_COUNT},
    palette::Palette,
    pixels::{Rgba, TileBuffer},
    tileset::{TilesetId, TilesetTable},
};

/// Edge length of a compiled tile.
pub const SUBTILE_SIZE: usize = 8;
pub const ENTRIES_PER_LAYER: usize = 4;
/// Two layers of four `u16` entries.
pub const METATILE_RECORD_BYTES: usize = 2 * ENTRIES_PER_LAYER * 2;
pub const COMPILED_SHEET_WIDTH: u32 = 128;
pub const COMPILED_SHEET_HEIGHT: u32 = 256;
const SHEET_TILES_PER_ROW: usize = COMPILED_SHEET_WIDTH as usize / SUBTILE_SIZE;
pub const MAX_COMPILED_TILES: usize =
    SHEET_TILES_PER_ROW * (COMPILED_SHEET_HEIGHT as usize / SUBTILE_SIZE);
/// The entry's palette field is four bits wide.
pub const MAX_PALETTES: usize = 16;

const TILE_ID_MASK: u16 = 0x3ff;
const QUADRANTS: [(u32, u32); ENTRIES_PER_LAYER] = [(0, 0), (8, 0), (0, 8), (8, 8)];

pub type IndexRows = [[u8; SUBTILE_SIZE]; SUBTILE_SIZE];

/// An 8x8 block of palette indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexedTile(IndexRows);

impl IndexedTile {
    #[must_use]
    pub fn new(rows: IndexRows) -> Self {
        Self(rows)
    }

    #[must_use]
    pub fn rows(&self) -> &IndexRows {
        &self.0
    }

    #[must_use]
    pub fn flip_x(&self) -> Self {
        let mut rows = self.0;
        for row in &mut rows {
            row.reverse();
        }
        Self(rows)
    }

    #[must_use]
    pub fn flip_y(&self) -> Self {
        let mut rows = self.0;
        rows.reverse();
        Self(rows)
    }

    /// The `(flip_x, flip_y)` pair that draws `self` as `candidate`, trying no
    /// flip, then X, then X and Y, then Y.
    #[must_use]
    pub fn orientation_of(&self, candidate: &Self) -> Option<(bool, bool)> {
        if self == candidate {
            return Some((false, false));
        }
        let flipped_x = candidate.flip_x();
        if *self == flipped_x {
            return Some((true, false));
        }
        if *self == flipped_x.flip_y() {
            return Some((true, true));
        }
        (*self == candidate.flip_y()).then_some((false, true))
    }
}

/// One packed reference to a compiled tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileEntry {
    pub tile_id: u16,
    pub flip_x: bool,
    pub flip_y: bool,
    pub palette: u8,
}

impl TileEntry {
    #[must_use]
    pub fn encode(self) -> u16 {
        (u16::from(self.palette & 0x0f) << 12)
            | (u16::from(self.flip_y) << 11)
            | (u16::from(self.flip_x) << 10)
            | (self.tile_id & TILE_ID_MASK)
    }
}

/// Deduplicating tile store. Tile 0 is always blank.
#[derive(Debug, Clone)]
pub struct TileBank {
    tiles: Vec<IndexedTile>,
}

impl Default for TileBank {
    fn default() -> Self {
        Self {
            tiles: vec![IndexedTile::default()],
        }
    }
}

impl TileBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the first stored tile that `tile` is a flip of, or
    /// appends it.
    pub fn push(&mut self, tile: IndexedTile) -> DomainResult<(u16, bool, bool)> {
        for (id, stored) in self.tiles.iter().enumerate() {
            if let Some((flip_x, flip_y)) = stored.orientation_of(&tile) {
                return Ok((id as u16, flip_x, flip_y));
            }
        }
        if self.tiles.len() >= MAX_COMPILED_TILES {
            return Err(DomainError::TileCapacityExceeded {
                limit: MAX_COMPILED_TILES,
            });
        }
        self.tiles.push(tile);
        Ok(((self.tiles.len() - 1) as u16, false, false))
    }

    #[must_use]
    pub fn tiles(&self) -> &[IndexedTile] {
        &self.tiles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Row-major palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    indices: Vec<u8>,
}

impl IndexedImage {
    pub fn new(width: u32, height: u32, indices: Vec<u8>) -> DomainResult<Self> {
        let expected = width as usize * height as usize;
        if width == 0 || indices.len() != expected {
            return Err(DomainError::InvalidPixelBuffer {
                expected,
                actual: indices.len(),
            });
        }
        Ok(Self {
            width,
            height,
            indices,
        })
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
    pub fn index(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width {
            return None;
        }
        self.indices
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Two pixels per byte with the left pixel in the high nibble. Odd-width
    /// rows are padded to a whole byte.
    #[must_use]
    pub fn pack_4bpp(&self) -> Vec<u8> {
        self.indices
            .chunks(self.width as usize)
            .flat_map(|row| row.chunks(2))
            .map(|pair| match *pair {
                [high, low] => ((high & 0x0f) << 4) | (low & 0x0f),
                [high] => (high & 0x0f) << 4,
                _ => 0,
            })
            .collect()
    }
}

/// A palette slot in the compiled output and the tileset it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteAssignment {
    pub tileset_id: TilesetId,
    pub palette: Palette,
}

#[derive(Debug, Clone)]
pub struct CompiledTileset {
    palettes: Vec<PaletteAssignment>,
    tiles: TileBank,
    metatiles: Vec<u8>,
}

impl CompiledTileset {
    #[must_use]
    pub fn palettes(&self) -> &[PaletteAssignment] {
        &self.palettes
    }

    pub fn palette(&self, index: usize) -> DomainResult<&Palette> {
        self.palettes
            .get(index)
            .map(|assignment| &assignment.palette)
            .ok_or(DomainError::UnknownPalette { index })
    }

    /// The sheet is written with the first palette, or all black if no slot
    /// references a tileset.
    #[must_use]
    pub fn sheet_palette(&self) -> Palette {
        self.palettes
            .first()
            .map(|assignment| assignment.palette)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn metatiles(&self) -> &[u8] {
        &self.metatiles
    }

    /// Lays the compiled tiles out sixteen per row on a 128x256 sheet.
    #[must_use]
    pub fn sheet(&self) -> IndexedImage {
        let width = COMPILED_SHEET_WIDTH as usize;
        let mut indices = vec![0u8; width * COMPILED_SHEET_HEIGHT as usize];
        for (id, tile) in self.tiles.tiles().iter().enumerate() {
            let origin_x = (id % SHEET_TILES_PER_ROW) * SUBTILE_SIZE;
            let origin_y = (id / SHEET_TILES_PER_ROW) * SUBTILE_SIZE;
            for (y, row) in tile.rows().iter().enumerate() {
                let start = (origin_y + y) * width + origin_x;
                if let Some(dest) = indices.get_mut(start..start + SUBTILE_SIZE) {
                    dest.copy_from_slice(row);
                }
            }
        }
        IndexedImage {
            width: COMPILED_SHEET_WIDTH,
            height: COMPILED_SHEET_HEIGHT,
            indices,
        }
    }
}

/// Compiles every slot of `store`. Unset layers compile to blank entries.
/// Fails if a referenced tileset has no palette or uses a color outside it.
pub fn compile(tilesets: &TilesetTable, store: &MetatileStore) -> DomainResult<CompiledTileset> {
    let palettes = assign_palettes(tilesets, store)?;
    let mut tiles = TileBank::new();
    let mut metatiles = Vec::with_capacity(SLOT_COUNT * METATILE_RECORD_BYTES);

    for (_, metatile) in store.iter() {
        for layer in [&metatile.bottom, &metatile.top] {
            for entry in compile_layer(layer, &palettes, &mut tiles)? {
                metatiles.extend_from_slice(&entry.encode().to_le_bytes());
            }
        }
    }

    Ok(CompiledTileset {
        palettes,
        tiles,
        metatiles,
    })
}

/// Palette slots go to referenced tilesets in upload order.
fn assign_palettes(
    tilesets: &TilesetTable,
    store: &MetatileStore,
) -> DomainResult<Vec<PaletteAssignment>> {
    let referenced: HashSet<&TilesetId> = store
        .iter()
        .flat_map(|(_, metatile)| [metatile.bottom.tile(), metatile.top.tile()])
        .flatten()
        .map(|tile| &tile.tileset_id)
        .collect();

    let mut palettes = Vec::new();
    for tileset in tilesets.iter().filter(|t| referenced.contains(t.id())) {
        let palette = tileset.palette().ok_or_else(|| DomainError::MissingPalette {
            tileset: tileset.id().to_string(),
        })?;
        if palettes.len() == MAX_PALETTES {
            return Err(DomainError::PaletteCapacityExceeded {
                limit: MAX_PALETTES,
            });
        }
        palettes.push(PaletteAssignment {
            tileset_id: tileset.id().clone(),
            palette: *palette,
        });
    }
    Ok(palettes)
}

fn compile_layer(
    layer: &LayerState,
    palettes: &[PaletteAssignment],
    tiles: &mut TileBank,
) -> DomainResult<[TileEntry; ENTRIES_PER_LAYER]> {
    let mut entries = [TileEntry::default(); ENTRIES_PER_LAYER];
    let Some(tile) = layer.tile() else {
        return Ok(entries);
    };

    let (slot, assignment) = palettes
        .iter()
        .enumerate()
        .find(|(_, assignment)| assignment.tileset_id == tile.tileset_id)
        .ok_or_else(|| DomainError::UnknownTileset {
            name: tile.tileset_id.to_string(),
        })?;

    for (entry, (origin_x, origin_y)) in entries.iter_mut().zip(QUADRANTS) {
        let indexed = index_quadrant(layer.pixels(), origin_x, origin_y, assignment)?;
        let (tile_id, flip_x, flip_y) = tiles.push(indexed)?;
        *entry = TileEntry {
            tile_id,
            flip_x,
            flip_y,
            palette: slot as u8,
        };
    }
    Ok(entries)
}

fn index_quadrant(
    pixels: &TileBuffer,
    origin_x: u32,
    origin_y: u32,
    assignment: &PaletteAssignment,
) -> DomainResult<IndexedTile> {
    let mut rows = IndexRows::default();
    for (y, row) in (0u32..).zip(rows.iter_mut()) {
        for (x, index) in (0u32..).zip(row.iter_mut()) {
            let pixel = pixels
                .pixel(origin_x + x, origin_y + y)
                .unwrap_or(Rgba::SENTINEL);
            *index = assignment.palette.index_of(pixel).ok_or_else(|| {
                DomainError::ColorNotInPalette {
                    tileset: assignment.tileset_id.to_string(),
                    color: pixel.to_string(),
                }
            })?;
        }
    }
    Ok(IndexedTile(rows))
}
