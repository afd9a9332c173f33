use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::broadcast;

use domain::events::SlotChangedEvent;
use metatile_application::{
    infrastructure_config::Config,
    ports::incoming::editor::{
        CompileUseCase, DefinitionUseCase, EditorStatusQuery, RenderUseCase, SlotEditUseCase,
        TilesetUseCase,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tileset_service: Arc<dyn TilesetUseCase + Send + Sync>,
    pub slot_service: Arc<dyn SlotEditUseCase + Send + Sync>,
    pub render_service: Arc<dyn RenderUseCase + Send + Sync>,
    pub definition_service: Arc<dyn DefinitionUseCase + Send + Sync>,
    pub compile_service: Arc<dyn CompileUseCase + Send + Sync>,
    pub status_query: Arc<dyn EditorStatusQuery + Send + Sync>,
    pub ws_broadcast: broadcast::Sender<SlotChangedEvent>,
    pub active_websocket_connections: Arc<AtomicUsize>,
}

/// Use cases backing the HTTP and WebSocket surfaces.
pub struct EditorUseCases {
    pub tileset_service: Arc<dyn TilesetUseCase + Send + Sync>,
    pub slot_service: Arc<dyn SlotEditUseCase + Send + Sync>,
    pub render_service: Arc<dyn RenderUseCase + Send + Sync>,
    pub definition_service: Arc<dyn DefinitionUseCase + Send + Sync>,
    pub compile_service: Arc<dyn CompileUseCase + Send + Sync>,
    pub status_query: Arc<dyn EditorStatusQuery + Send + Sync>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        use_cases: EditorUseCases,
        ws_broadcast: broadcast::Sender<SlotChangedEvent>,
    ) -> Self {
        Self {
            config,
            tileset_service: use_cases.tileset_service,
            slot_service: use_cases.slot_service,
            render_service: use_cases.render_service,
            definition_service: use_cases.definition_service,
            compile_service: use_cases.compile_service,
            status_query: use_cases.status_query,
            ws_broadcast,
            active_websocket_connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn increment_websocket_connections(&self) -> usize {
        self.active_websocket_connections
            .fetch_add(1, Ordering::Relaxed)
            + 1
    }

    pub fn decrement_websocket_connections(&self) -> usize {
        self.active_websocket_connections
            .fetch_sub(1, Ordering::Relaxed)
            .saturating_sub(1)
    }

    pub fn get_websocket_connection_count(&self) -> usize {
        self.active_websocket_connections.load(Ordering::Relaxed)
    }

    pub fn check_websocket_connection_limit(&self) -> bool {
        if let Some(max_connections) = self.config.websocket.max_connections {
            self.get_websocket_connection_count() < max_connections
        } else {
            true
        }
    }
}
