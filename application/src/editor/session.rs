use tracing::debug;

use domain::{
    addressing::{display_to_image, pixel_to_tile},
    compile::{CompiledTileset, compile},
    definition::{UnsetLayerEncoding, decode, encode},
    error::{DomainError, DomainResult},
    events::SlotChangedEvent,
    metatile::{Layer, MetatileStore, SlotIndex},
    tileset::{Tileset, TilesetId, TilesetTable},
};

use super::views::{EditorStatus, ImportSummary, PaintTarget, SlotSnapshot};

/// Everything one editor instance owns: uploads and the slot bank.
#[derive(Debug, Default)]
pub struct EditorSession {
    tilesets: TilesetTable,
    store: MetatileStore,
}

impl EditorSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tilesets(&self) -> &TilesetTable {
        &self.tilesets
    }

    #[must_use]
    pub fn store(&self) -> &MetatileStore {
        &self.store
    }

    pub fn add_tileset(&mut self, tileset: Tileset) -> DomainResult<&Tileset> {
        let id = self.tilesets.insert(tileset)?;
        self.tilesets.require(&id)
    }

    pub fn select(&mut self, slot: SlotIndex) -> DomainResult<SlotSnapshot> {
        self.store.select(slot);
        self.snapshot(slot)
    }

    pub fn snapshot(&self, slot: SlotIndex) -> DomainResult<SlotSnapshot> {
        let metatile = self.store.slot(slot)?;
        Ok(SlotSnapshot::new(slot, metatile, self.store.selected()))
    }

    /// Maps a preview click to a tile and copies it into the selected slot.
    pub fn paint(&mut self, layer: Layer, target: &PaintTarget) -> DomainResult<SlotIndex> {
        let slot = self.store.selected().ok_or(DomainError::NoSlotSelected)?;
        let tileset = self.tilesets.require(&target.tileset_id)?;

        let (pixel_x, pixel_y) = display_to_image(
            target.x,
            target.y,
            target.display_size.unwrap_or((0.0, 0.0)),
            (tileset.width(), tileset.height()),
        );
        let address = pixel_to_tile(tileset.width(), pixel_x, pixel_y);
        if address.column >= tileset.tiles_per_row() {
            return Err(DomainError::TileOutOfImageBounds {
                column: address.column,
                row: address.row,
                width: tileset.width(),
                height: tileset.height(),
            });
        }

        self.store.set_tile(slot, layer, tileset, address.index)?;
        debug!(%slot, %layer, tileset = %tileset.id(), %address, "Painted layer");
        Ok(slot)
    }

    pub fn set_layer(
        &mut self,
        slot: SlotIndex,
        layer: Layer,
        tileset_id: &TilesetId,
        tile_index: u32,
    ) -> DomainResult<()> {
        let tileset = self.tilesets.require(tileset_id)?;
        self.store.set_tile(slot, layer, tileset, tile_index)?;
        debug!(%slot, %layer, tileset = %tileset_id, tile_index, "Set layer");
        Ok(())
    }

    pub fn clear_layer(&mut self, slot: SlotIndex, layer: Layer) -> DomainResult<()> {
        self.store.clear_tile(slot, layer)?;
        debug!(%slot, %layer, "Cleared layer");
        Ok(())
    }

    #[must_use]
    pub fn export(&self, unset_layers: UnsetLayerEncoding) -> String {
        encode(&self.tilesets, &self.store, unset_layers)
    }

    /// Applies a definition file. Nothing changes unless every line decodes.
    pub fn import(&mut self, text: &str) -> DomainResult<(ImportSummary, Vec<SlotIndex>)> {
        let decoded = decode(text, &self.tilesets)?;
        let aliases = decoded.aliases.len();
        let last = decoded.last_slot();

        let touched = self.store.apply(decoded.assignments);
        if let Some(slot) = last {
            self.store.select(slot);
        }

        let summary = ImportSummary {
            records: touched.len(),
            aliases,
            selected: self.store.selected(),
        };
        Ok((summary, touched))
    }

    pub fn compile(&self) -> DomainResult<CompiledTileset> {
        compile(&self.tilesets, &self.store)
    }

    pub fn slot_changed(&self, slot: SlotIndex) -> DomainResult<SlotChangedEvent> {
        Ok(SlotChangedEvent {
            slot,
            composite: self.store.composite(slot)?,
        })
    }

    #[must_use]
    pub fn status(&self) -> EditorStatus {
        let assigned_slots = self
            .store
            .iter()
            .filter(|(_, metatile)| metatile.bottom.is_set() || metatile.top.is_set())
            .count();
        EditorStatus {
            tilesets: self.tilesets.len(),
            assigned_slots,
            selected: self.store.selected(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::pixels::{PixelImage, Rgba};

    fn session_with(file_name: &str, width: u32, height: u32) -> (EditorSession, TilesetId) {
        let mut session = EditorSession::new();
        let image = PixelImage::filled(width, height, Rgba::new(10, 20, 30, 255));
        let id = session
            .add_tileset(Tileset::new(file_name, image).unwrap())
            .unwrap()
            .id()
            .clone();
        (session, id)
    }

    fn slot(index: usize) -> SlotIndex {
        SlotIndex::new(index).unwrap()
    }

    fn click(tileset_id: &TilesetId, x: f64, y: f64) -> PaintTarget {
        PaintTarget {
            tileset_id: tileset_id.clone(),
            x,
            y,
            display_size: None,
        }
    }

    #[test]
    fn paint_requires_selection() {
        let (mut session, id) = session_with("a.png", 32, 32);
        let error = session.paint(Layer::Bottom, &click(&id, 1.0, 1.0)).unwrap_err();
        assert_eq!(error, DomainError::NoSlotSelected);
    }

    #[test]
    fn paint_maps_click_to_tile_index() {
        let (mut session, id) = session_with("a.png", 64, 32);
        session.select(slot(5)).unwrap();

        session.paint(Layer::Top, &click(&id, 37.0, 20.0)).unwrap();

        let snapshot = session.snapshot(slot(5)).unwrap();
        assert!(snapshot.selected);
        assert_eq!(snapshot.top.unwrap().tile_index, 6);
        assert!(snapshot.bottom.is_none());
    }

    #[test]
    fn paint_scales_from_display_size() {
        let (mut session, id) = session_with("a.png", 64, 32);
        session.select(slot(0)).unwrap();
        let target = PaintTarget {
            display_size: Some((128.0, 64.0)),
            ..click(&id, 74.0, 40.0)
        };

        session.paint(Layer::Bottom, &target).unwrap();

        assert_eq!(
            session.snapshot(slot(0)).unwrap().bottom.unwrap().tile_index,
            6
        );
    }

    #[test]
    fn click_past_right_edge_does_not_wrap() {
        let (mut session, id) = session_with("a.png", 32, 32);
        session.select(slot(0)).unwrap();
        let error = session.paint(Layer::Bottom, &click(&id, 40.0, 0.0)).unwrap_err();
        assert!(matches!(error, DomainError::TileOutOfImageBounds { .. }));
    }

    #[test]
    fn import_selects_last_record_and_failed_import_changes_nothing() {
        let (mut session, _) = session_with("a.png", 16, 16);

        let (summary, touched) = session.import("A=a.png\nA,0,-,0 A,0,A,0").unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.selected, Some(slot(1)));
        assert_eq!(touched, vec![slot(0), slot(1)]);

        let before = session.export(UnsetLayerEncoding::Explicit);
        assert!(session.import("A=a.png\n-,0,-,0 B,0,B,0").is_err());
        assert_eq!(session.export(UnsetLayerEncoding::Explicit), before);
        assert_eq!(session.store().selected(), Some(slot(1)));
    }

    #[test]
    fn status_counts_assigned_slots() {
        let (mut session, id) = session_with("a.png", 16, 16);
        session.set_layer(slot(3), Layer::Bottom, &id, 0).unwrap();
        session.set_layer(slot(4), Layer::Top, &id, 0).unwrap();
        session.clear_layer(slot(4), Layer::Top).unwrap();

        let status = session.status();
        assert_eq!(status.tilesets, 1);
        assert_eq!(status.assigned_slots, 1);
    }
}
