use std::sync::Arc;
use tokio::sync::broadcast;

use domain::events::SlotChangedEvent;
use metatile_adapters::{
    outgoing::{
        events_broadcast::tokio_broadcast::TokioBroadcastSlotEventsAdapter,
        image_rs::png_codec_image::ImagePngAdapter,
    },
    shared::app_state::{AppState as AdaptersAppState, EditorUseCases},
};
use metatile_application::{
    config::EditorSettings,
    editor::service::{EditorService, EditorServiceDeps},
    infrastructure_config::Config,
    ports::outgoing::{image_codec::DynImageCodecPort, slot_events::DynSlotEventsPort},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub editor_service: Arc<EditorService>,
    pub ws_broadcast: broadcast::Sender<SlotChangedEvent>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let (ws_broadcast, _) = broadcast::channel(config.websocket.broadcast_buffer_size);
        let editor_service = Self::create_editor_service(&config, &ws_broadcast);

        Self {
            config,
            editor_service,
            ws_broadcast,
        }
    }

    fn create_editor_service(
        config: &Config,
        ws_broadcast: &broadcast::Sender<SlotChangedEvent>,
    ) -> Arc<EditorService> {
        let codec_port: DynImageCodecPort = Arc::new(ImagePngAdapter::new());
        let events_port: DynSlotEventsPort =
            Arc::new(TokioBroadcastSlotEventsAdapter::new(ws_broadcast.clone()));

        EditorService::new(
            EditorSettings::from(&config.editor),
            EditorServiceDeps {
                codec_port,
                events_port,
            },
        )
    }

    pub fn to_adapters_state(&self) -> AdaptersAppState {
        let use_cases = EditorUseCases {
            tileset_service: Arc::<EditorService>::clone(&self.editor_service),
            slot_service: Arc::<EditorService>::clone(&self.editor_service),
            render_service: Arc::<EditorService>::clone(&self.editor_service),
            definition_service: Arc::<EditorService>::clone(&self.editor_service),
            compile_service: Arc::<EditorService>::clone(&self.editor_service),
            status_query: Arc::<EditorService>::clone(&self.editor_service),
        };

        AdaptersAppState::new(
            Arc::clone(&self.config),
            use_cases,
            self.ws_broadcast.clone(),
        )
    }
}
