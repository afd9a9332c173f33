use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use domain::{
    error::DomainError,
    events::SlotChangedEvent,
    metatile::{Layer, SlotIndex},
    tileset::{Tileset, TilesetId},
};

use crate::{
    config::EditorSettings,
    error::{AppError, AppResult},
    ports::{
        incoming::editor::{
            CompileUseCase, DefinitionUseCase, EditorStatusQuery, RenderUseCase, SlotEditUseCase,
            TilesetUseCase,
        },
        outgoing::{image_codec::DynImageCodecPort, slot_events::DynSlotEventsPort},
    },
};

use super::{
    session::EditorSession,
    views::{
        CompileSummary, EditorStatus, ImportSummary, PaintTarget, SlotSnapshot, TilesetSummary,
    },
};

pub struct EditorServiceDeps {
    pub codec_port: DynImageCodecPort,
    pub events_port: DynSlotEventsPort,
}

pub struct EditorService {
    settings: EditorSettings,
    session: Mutex<EditorSession>,
    codec_port: DynImageCodecPort,
    events_port: DynSlotEventsPort,
}

impl EditorService {
    #[must_use]
    pub fn new(settings: EditorSettings, deps: EditorServiceDeps) -> Arc<Self> {
        Arc::new(Self {
            settings,
            session: Mutex::new(EditorSession::new()),
            codec_port: deps.codec_port,
            events_port: deps.events_port,
        })
    }

    fn session(&self) -> AppResult<MutexGuard<'_, EditorSession>> {
        self.session.lock().map_err(|_| AppError::InternalServerError)
    }

    /// Fires change notifications once the session lock has been released.
    fn publish(&self, events: Vec<SlotChangedEvent>) {
        for event in events {
            let slot = event.slot;
            if let Err(error) = self.events_port.slot_changed(event) {
                warn!(%slot, "Failed to publish slot change: {}", error);
            }
        }
    }

    fn mutate_slot<F>(&self, slot_of: F) -> AppResult<SlotSnapshot>
    where
        F: FnOnce(&mut EditorSession) -> AppResult<SlotIndex>,
    {
        let (snapshot, event) = {
            let mut session = self.session()?;
            let slot = slot_of(&mut *session)?;
            (session.snapshot(slot)?, session.slot_changed(slot)?)
        };
        self.publish(vec![event]);
        Ok(snapshot)
    }
}

impl TilesetUseCase for EditorService {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    fn upload_tileset(&self, file_name: &str, bytes: &[u8]) -> AppResult<TilesetSummary> {
        if bytes.len() > self.settings.max_upload_bytes {
            return Err(AppError::PayloadTooLarge {
                size: bytes.len(),
                limit: self.settings.max_upload_bytes,
            });
        }

        let image = self.codec_port.decode_rgba(bytes)?;
        let mut tileset = Tileset::new(file_name, image)?;
        if let Some(palette) = self.codec_port.read_palette(bytes)? {
            tileset = tileset.with_palette(palette);
        }

        let mut session = self.session()?;
        let summary = TilesetSummary::from(session.add_tileset(tileset)?);
        info!(
            id = %summary.id,
            width = summary.width,
            height = summary.height,
            tiles = summary.tile_count,
            indexed = summary.has_palette,
            "Tileset uploaded"
        );
        Ok(summary)
    }

    fn list_tilesets(&self) -> AppResult<Vec<TilesetSummary>> {
        let session = self.session()?;
        Ok(session.tilesets().iter().map(TilesetSummary::from).collect())
    }
}

impl SlotEditUseCase for EditorService {
    #[instrument(skip(self))]
    fn select_slot(&self, slot: SlotIndex) -> AppResult<SlotSnapshot> {
        let mut session = self.session()?;
        debug!(%slot, "Slot selected");
        Ok(session.select(slot)?)
    }

    fn selected_slot(&self) -> AppResult<Option<SlotIndex>> {
        Ok(self.session()?.store().selected())
    }

    #[instrument(skip(self))]
    fn paint_layer(&self, layer: Layer, target: PaintTarget) -> AppResult<SlotSnapshot> {
        self.mutate_slot(|session| Ok(session.paint(layer, &target)?))
    }

    #[instrument(skip(self))]
    fn set_slot_layer(
        &self,
        slot: SlotIndex,
        layer: Layer,
        tileset_id: &TilesetId,
        tile_index: u32,
    ) -> AppResult<SlotSnapshot> {
        self.mutate_slot(|session| {
            session.set_layer(slot, layer, tileset_id, tile_index)?;
            Ok(slot)
        })
    }

    #[instrument(skip(self))]
    fn clear_slot_layer(&self, slot: SlotIndex, layer: Layer) -> AppResult<SlotSnapshot> {
        self.mutate_slot(|session| {
            session.clear_layer(slot, layer)?;
            Ok(slot)
        })
    }

    fn slot(&self, slot: SlotIndex) -> AppResult<SlotSnapshot> {
        Ok(self.session()?.snapshot(slot)?)
    }
}

impl RenderUseCase for EditorService {
    fn composite_png(&self, slot: SlotIndex) -> AppResult<Vec<u8>> {
        let composite = self.session()?.store().composite(slot)?;
        self.codec_port.encode_png(&composite.to_image())
    }

    fn layer_png(&self, slot: SlotIndex, layer: Layer) -> AppResult<Vec<u8>> {
        let image = {
            let session = self.session()?;
            session.store().slot(slot)?.layer(layer).pixels().to_image()
        };
        self.codec_port.encode_png(&image)
    }

    #[instrument(skip(self))]
    fn sheet_png(&self) -> AppResult<Vec<u8>> {
        let sheet = self.session()?.store().render_sheet();
        self.codec_port.encode_png(&sheet)
    }
}

impl DefinitionUseCase for EditorService {
    #[instrument(skip(self))]
    fn export_text(&self) -> AppResult<String> {
        let text = self.session()?.export(self.settings.unset_layers);
        debug!(bytes = text.len(), "Exported definitions");
        Ok(text)
    }

    #[instrument(skip(self, text), fields(bytes = text.len()))]
    fn import_text(&self, text: &str) -> AppResult<ImportSummary> {
        let (summary, events) = {
            let mut session = self.session()?;
            let (summary, touched) = session.import(text)?;
            let events = touched
                .into_iter()
                .map(|slot| session.slot_changed(slot))
                .collect::<Result<Vec<_>, _>>()?;
            (summary, events)
        };
        info!(
            records = summary.records,
            aliases = summary.aliases,
            "Imported definitions"
        );
        self.publish(events);
        Ok(summary)
    }
}

impl CompileUseCase for EditorService {
    fn tileset_palette(&self, tileset_id: &TilesetId) -> AppResult<String> {
        let session = self.session()?;
        let palette = session
            .tilesets()
            .require(tileset_id)?
            .palette()
            .ok_or_else(|| DomainError::MissingPalette {
                tileset: tileset_id.to_string(),
            })?;
        Ok(palette.to_jasc())
    }

    fn compile_summary(&self) -> AppResult<CompileSummary> {
        let compiled = self.session()?.compile()?;
        Ok(CompileSummary::from(&compiled))
    }

    #[instrument(skip(self))]
    fn compiled_sheet_png(&self) -> AppResult<Vec<u8>> {
        let compiled = self.session()?.compile()?;
        debug!(
            tiles = compiled.tile_count(),
            palettes = compiled.palettes().len(),
            "Compiled tile sheet"
        );
        self.codec_port
            .encode_indexed_png(&compiled.sheet(), &compiled.sheet_palette())
    }

    fn compiled_metatiles(&self) -> AppResult<Vec<u8>> {
        Ok(self.session()?.compile()?.metatiles().to_vec())
    }

    fn compiled_palette(&self, index: usize) -> AppResult<String> {
        let compiled = self.session()?.compile()?;
        Ok(compiled.palette(index)?.to_jasc())
    }
}

impl EditorStatusQuery for EditorService {
    fn status(&self) -> AppResult<EditorStatus> {
        Ok(self.session()?.status())
    }
}
