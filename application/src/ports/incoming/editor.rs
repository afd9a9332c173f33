use crate::{
    editor::views::{
        CompileSummary, EditorStatus, ImportSummary, PaintTarget, SlotSnapshot, TilesetSummary,
    },
    error::AppResult,
};
use domain::{
    metatile::{Layer, SlotIndex},
    tileset::TilesetId,
};

pub trait TilesetUseCase: Send + Sync {
    fn upload_tileset(&self, file_name: &str, bytes: &[u8]) -> AppResult<TilesetSummary>;

    fn list_tilesets(&self) -> AppResult<Vec<TilesetSummary>>;
}

pub trait SlotEditUseCase: Send + Sync {
    fn select_slot(&self, slot: SlotIndex) -> AppResult<SlotSnapshot>;

    fn selected_slot(&self) -> AppResult<Option<SlotIndex>>;

    /// Edits the selected slot from a click on the tileset preview.
    fn paint_layer(&self, layer: Layer, target: PaintTarget) -> AppResult<SlotSnapshot>;

    fn set_slot_layer(
        &self,
        slot: SlotIndex,
        layer: Layer,
        tileset_id: &TilesetId,
        tile_index: u32,
    ) -> AppResult<SlotSnapshot>;

    fn clear_slot_layer(&self, slot: SlotIndex, layer: Layer) -> AppResult<SlotSnapshot>;

    fn slot(&self, slot: SlotIndex) -> AppResult<SlotSnapshot>;
}

pub trait RenderUseCase: Send + Sync {
    fn composite_png(&self, slot: SlotIndex) -> AppResult<Vec<u8>>;

    fn layer_png(&self, slot: SlotIndex, layer: Layer) -> AppResult<Vec<u8>>;

    fn sheet_png(&self) -> AppResult<Vec<u8>>;
}

pub trait DefinitionUseCase: Send + Sync {
    fn export_text(&self) -> AppResult<String>;

    fn import_text(&self, text: &str) -> AppResult<ImportSummary>;
}

/// Palette files and the compiled tile sheet, entry table and palettes.
pub trait CompileUseCase: Send + Sync {
    /// JASC-PAL text for an uploaded indexed tileset.
    fn tileset_palette(&self, tileset_id: &TilesetId) -> AppResult<String>;

    fn compile_summary(&self) -> AppResult<CompileSummary>;

    /// 128x256 4-bit indexed PNG of the deduplicated tiles.
    fn compiled_sheet_png(&self) -> AppResult<Vec<u8>>;

    /// Little-endian tile entries, sixteen bytes per slot.
    fn compiled_metatiles(&self) -> AppResult<Vec<u8>>;

    fn compiled_palette(&self, index: usize) -> AppResult<String>;
}

pub trait EditorStatusQuery: Send + Sync {
    fn status(&self) -> AppResult<EditorStatus>;
}
