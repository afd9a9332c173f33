use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    compositor::merge,
    error::{DomainError, DomainResult},
    pixels::{PixelImage, Rgba, TILE_ROW_BYTES, TILE_SIZE, TileBuffer},
    tileset::{Tileset, TilesetId},
};

/// Number of metatile slots in a store.
pub const SLOT_COUNT: usize = 128;
/// Slots per row of the rendered sheet.
pub const SHEET_COLUMNS: usize = 8;
pub const SHEET_WIDTH: u32 = SHEET_COLUMNS as u32 * TILE_SIZE;
pub const SHEET_HEIGHT: u32 = (SLOT_COUNT / SHEET_COLUMNS) as u32 * TILE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SlotIndex(usize);

impl SlotIndex {
    pub fn new(index: usize) -> DomainResult<Self> {
        if index >= SLOT_COUNT {
            return Err(DomainError::OutOfBoundsSlot { index });
        }
        Ok(Self(index))
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }

    /// Every slot, in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SLOT_COUNT).map(Self)
    }
}

impl TryFrom<usize> for SlotIndex {
    type Error = DomainError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SlotIndex> for usize {
    fn from(slot: SlotIndex) -> Self {
        slot.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Bottom,
    Top,
}

impl Layer {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bottom => "bottom",
            Self::Top => "top",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tile of which tileset a layer was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRef {
    pub tileset_id: TilesetId,
    pub tile_index: u32,
}

/// One layer of a metatile: its source reference plus the copied pixels.
/// Pixels are owned so a later change to the tileset cannot reach them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerState {
    tile: Option<TileRef>,
    pixels: TileBuffer,
}

impl LayerState {
    /// Unset layer, filled with the sentinel color.
    #[must_use]
    pub fn unset() -> Self {
        Self::default()
    }

    /// Copies tile `index` out of `tileset`.
    pub fn from_tileset(tileset: &Tileset, index: u32) -> DomainResult<Self> {
        let pixels = tileset.extract(index)?;
        Ok(Self {
            tile: Some(TileRef {
                tileset_id: tileset.id().clone(),
                tile_index: index,
            }),
            pixels,
        })
    }

    #[must_use]
    pub fn tile(&self) -> Option<&TileRef> {
        self.tile.as_ref()
    }

    #[must_use]
    pub fn pixels(&self) -> &TileBuffer {
        &self.pixels
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.tile.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metatile {
    pub bottom: LayerState,
    pub top: LayerState,
}

impl Metatile {
    #[must_use]
    pub fn layer(&self, layer: Layer) -> &LayerState {
        match layer {
            Layer::Bottom => &self.bottom,
            Layer::Top => &self.top,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut LayerState {
        match layer {
            Layer::Bottom => &mut self.bottom,
            Layer::Top => &mut self.top,
        }
    }

    /// Composite of both layers, computed from their current pixels.
    #[must_use]
    pub fn composite(&self) -> TileBuffer {
        merge(&self.bottom.pixels, &self.top.pixels)
    }
}

/// Full replacement of one slot, produced by definition import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    pub slot: SlotIndex,
    pub bottom: LayerState,
    pub top: LayerState,
}

/// The fixed bank of metatile slots plus the current selection.
#[derive(Debug, Clone)]
pub struct MetatileStore {
    slots: Vec<Metatile>,
    selected: Option<SlotIndex>,
}

impl Default for MetatileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetatileStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Metatile::default(); SLOT_COUNT],
            selected: None,
        }
    }

    pub fn slot(&self, slot: SlotIndex) -> DomainResult<&Metatile> {
        self.slots
            .get(slot.get())
            .ok_or(DomainError::OutOfBoundsSlot { index: slot.get() })
    }

    fn slot_mut(&mut self, slot: SlotIndex) -> DomainResult<&mut Metatile> {
        self.slots
            .get_mut(slot.get())
            .ok_or(DomainError::OutOfBoundsSlot { index: slot.get() })
    }

    /// Copies tile `index` of `tileset` into one layer of `slot`. On failure
    /// the slot is left untouched.
    pub fn set_tile(
        &mut self,
        slot: SlotIndex,
        layer: Layer,
        tileset: &Tileset,
        index: u32,
    ) -> DomainResult<&Metatile> {
        let state = LayerState::from_tileset(tileset, index)?;
        let metatile = self.slot_mut(slot)?;
        *metatile.layer_mut(layer) = state;
        Ok(metatile)
    }

    pub fn clear_tile(&mut self, slot: SlotIndex, layer: Layer) -> DomainResult<&Metatile> {
        let metatile = self.slot_mut(slot)?;
        *metatile.layer_mut(layer) = LayerState::unset();
        Ok(metatile)
    }

    pub fn composite(&self, slot: SlotIndex) -> DomainResult<TileBuffer> {
        self.slot(slot).map(Metatile::composite)
    }

    pub fn select(&mut self, slot: SlotIndex) {
        self.selected = Some(slot);
    }

    #[must_use]
    pub fn selected(&self) -> Option<SlotIndex> {
        self.selected
    }

    /// Replaces each assigned slot wholesale. Assignments are already
    /// validated, so this cannot fail part way.
    pub fn apply(&mut self, assignments: Vec<SlotAssignment>) -> Vec<SlotIndex> {
        let mut touched = Vec::with_capacity(assignments.len());
        for SlotAssignment { slot, bottom, top } in assignments {
            if let Some(metatile) = self.slots.get_mut(slot.get()) {
                *metatile = Metatile { bottom, top };
                touched.push(slot);
            }
        }
        touched
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &Metatile)> {
        SlotIndex::all().zip(self.slots.iter())
    }

    /// Renders every composite into one sheet, eight slots per row.
    #[must_use]
    pub fn render_sheet(&self) -> PixelImage {
        let mut sheet = PixelImage::filled(SHEET_WIDTH, SHEET_HEIGHT, Rgba::SENTINEL);
        for (slot, metatile) in self.iter() {
            let origin_x = (slot.get() % SHEET_COLUMNS) as u32 * TILE_SIZE;
            let origin_y = (slot.get() / SHEET_COLUMNS) as u32 * TILE_SIZE;
            let composite = metatile.composite();
            for (y, source_row) in (0..TILE_SIZE).zip(composite.rows()) {
                if let Some(dest) = sheet.row_span_mut(origin_x, origin_y + y, TILE_ROW_BYTES) {
                    dest.copy_from_slice(source_row);
                }
            }
        }
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tileset_with_colors() -> Tileset {
        // 32x16: tile 0 is red, tile 1 is blue.
        let mut image = PixelImage::filled(32, 16, Rgba::new(255, 0, 0, 255));
        for y in 0..16 {
            let span = image.row_span_mut(16, y, TILE_ROW_BYTES).unwrap();
            for pixel in span.chunks_exact_mut(4) {
                pixel.copy_from_slice(&[0, 0, 255, 255]);
            }
        }
        Tileset::new("colors.png", image).unwrap()
    }

    fn slot(index: usize) -> SlotIndex {
        SlotIndex::new(index).unwrap()
    }

    #[test]
    fn slot_index_is_bounded() {
        assert!(SlotIndex::new(127).is_ok());
        assert_eq!(
            SlotIndex::new(128).unwrap_err(),
            DomainError::OutOfBoundsSlot { index: 128 }
        );
        assert_eq!(SlotIndex::all().count(), SLOT_COUNT);
    }

    #[test]
    fn slot_index_deserialization_rejects_out_of_range() {
        assert!(serde_json::from_str::<SlotIndex>("5").is_ok());
        assert!(serde_json::from_str::<SlotIndex>("128").is_err());
    }

    #[test]
    fn fresh_store_is_all_sentinel() {
        let store = MetatileStore::new();
        assert_eq!(store.iter().count(), SLOT_COUNT);
        assert!(store.selected().is_none());
        for (slot, metatile) in store.iter() {
            assert!(!metatile.bottom.is_set());
            assert!(store.composite(slot).unwrap().is_sentinel_fill());
        }
    }

    #[test]
    fn set_tile_copies_pixels_and_reference() {
        let tileset = tileset_with_colors();
        let mut store = MetatileStore::new();
        store.set_tile(slot(3), Layer::Bottom, &tileset, 1).unwrap();

        let metatile = store.slot(slot(3)).unwrap();
        assert_eq!(
            metatile.bottom.tile(),
            Some(&TileRef {
                tileset_id: tileset.id().clone(),
                tile_index: 1
            })
        );
        assert_eq!(metatile.bottom.pixels().pixel(0, 0), Some(Rgba::new(0, 0, 255, 255)));
        assert_eq!(
            store.composite(slot(3)).unwrap().pixel(8, 8),
            Some(Rgba::new(0, 0, 255, 255))
        );
    }

    #[test]
    fn failed_set_leaves_slot_untouched() {
        let tileset = tileset_with_colors();
        let mut store = MetatileStore::new();
        store.set_tile(slot(0), Layer::Top, &tileset, 0).unwrap();
        let before = store.slot(slot(0)).unwrap().clone();

        assert!(store.set_tile(slot(0), Layer::Top, &tileset, 2).is_err());
        assert_eq!(store.slot(slot(0)).unwrap(), &before);
    }

    #[test]
    fn top_layer_covers_bottom_until_cleared() {
        let tileset = tileset_with_colors();
        let mut store = MetatileStore::new();
        store.set_tile(slot(7), Layer::Bottom, &tileset, 0).unwrap();
        store.set_tile(slot(7), Layer::Top, &tileset, 1).unwrap();
        assert_eq!(
            store.composite(slot(7)).unwrap().pixel(0, 0),
            Some(Rgba::new(0, 0, 255, 255))
        );

        store.clear_tile(slot(7), Layer::Top).unwrap();
        assert_eq!(
            store.composite(slot(7)).unwrap().pixel(0, 0),
            Some(Rgba::new(255, 0, 0, 255))
        );
        assert!(!store.slot(slot(7)).unwrap().top.is_set());
    }

    #[test]
    fn apply_replaces_whole_slots() {
        let tileset = tileset_with_colors();
        let mut store = MetatileStore::new();
        store.set_tile(slot(2), Layer::Top, &tileset, 1).unwrap();

        let touched = store.apply(vec![SlotAssignment {
            slot: slot(2),
            bottom: LayerState::from_tileset(&tileset, 0).unwrap(),
            top: LayerState::unset(),
        }]);

        assert_eq!(touched, vec![slot(2)]);
        let metatile = store.slot(slot(2)).unwrap();
        assert!(metatile.bottom.is_set());
        assert!(!metatile.top.is_set());
    }

    #[test]
    fn sheet_places_slots_eight_per_row() {
        let tileset = tileset_with_colors();
        let mut store = MetatileStore::new();
        store.set_tile(slot(9), Layer::Bottom, &tileset, 1).unwrap();

        let sheet = store.render_sheet();
        assert_eq!((sheet.width(), sheet.height()), (128, 256));
        // Slot 9 is column 1, row 1.
        assert_eq!(sheet.pixel(16, 16), Some(Rgba::new(0, 0, 255, 255)));
        assert_eq!(sheet.pixel(31, 31), Some(Rgba::new(0, 0, 255, 255)));
        assert_eq!(sheet.pixel(15, 16), Some(Rgba::SENTINEL));
        assert_eq!(sheet.pixel(127, 255), Some(Rgba::SENTINEL));
    }
}
