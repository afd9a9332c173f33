use serde::Serialize;

use domain::{
    compile::CompiledTileset,
    metatile::{Metatile, SlotIndex, TileRef},
    tileset::{Tileset, TilesetId},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TilesetSummary {
    pub id: TilesetId,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub tiles_per_row: u32,
    pub tile_count: u32,
    pub has_palette: bool,
}

impl From<&Tileset> for TilesetSummary {
    fn from(tileset: &Tileset) -> Self {
        Self {
            id: tileset.id().clone(),
            file_name: tileset.file_name().to_string(),
            width: tileset.width(),
            height: tileset.height(),
            tiles_per_row: tileset.tiles_per_row(),
            tile_count: tileset.tile_count(),
            has_palette: tileset.palette().is_some(),
        }
    }
}

/// Layer references of one slot. Pixels are served separately as PNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSnapshot {
    pub slot: SlotIndex,
    pub selected: bool,
    pub bottom: Option<TileRef>,
    pub top: Option<TileRef>,
}

impl SlotSnapshot {
    #[must_use]
    pub fn new(slot: SlotIndex, metatile: &Metatile, selected: Option<SlotIndex>) -> Self {
        Self {
            slot,
            selected: selected == Some(slot),
            bottom: metatile.bottom.tile().cloned(),
            top: metatile.top.tile().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub records: usize,
    pub aliases: usize,
    pub selected: Option<SlotIndex>,
}

/// What compiling the bank would produce. Palette `n` belongs to
/// `palettes[n]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileSummary {
    pub tiles: usize,
    pub palettes: Vec<TilesetId>,
    pub metatile_bytes: usize,
}

impl From<&CompiledTileset> for CompileSummary {
    fn from(compiled: &CompiledTileset) -> Self {
        Self {
            tiles: compiled.tile_count(),
            palettes: compiled
                .palettes()
                .iter()
                .map(|assignment| assignment.tileset_id.clone())
                .collect(),
            metatile_bytes: compiled.metatiles().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorStatus {
    pub tilesets: usize,
    pub assigned_slots: usize,
    pub selected: Option<SlotIndex>,
}

/// A click on a tileset preview. `display_size` is the rendered size of the
/// preview when it differs from the image's natural size.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintTarget {
    pub tileset_id: TilesetId,
    pub x: f64,
    pub y: f64,
    pub display_size: Option<(f64, f64)>,
}
