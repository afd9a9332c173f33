use axum::{
    Router,
    routing::{get, post, put},
};

use crate::shared::app_state::AppState;
use crate::{
    incoming::http_axum::{
        handlers::{
            compiled::{compile_summary, compiled_metatiles, compiled_palette, compiled_sheet_png},
            definitions::{export_definitions, import_definitions},
            health::health_check,
            images::{composite_png, layer_png, sheet_png},
            slots::{
                clear_slot_layer, get_selected_slot, get_slot, paint_selected_slot, select_slot,
                set_slot_layer,
            },
            tilesets::{list_tilesets, tileset_palette, upload_tileset},
        },
        router_ext::RouterExt,
    },
    incoming::ws_axum::endpoint::websocket_handler,
};

pub fn build_application_router(state: &AppState) -> Router<AppState> {
    build_core_routes()
        .merge(build_tileset_routes(state))
        .merge(build_slot_routes())
        .merge(build_definition_routes(state))
        .merge(build_compiled_routes())
        .with_request_id()
}

fn build_core_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/sheet.png", get(sheet_png))
        .route("/live", get(websocket_handler))
}

fn build_tileset_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/tilesets", get(list_tilesets))
        .route("/tilesets/{file_name}", put(upload_tileset))
        .route("/tilesets/{file_name}/palette.pal", get(tileset_palette))
        .with_body_limit(state.config.editor.max_upload_bytes)
}

fn build_slot_routes() -> Router<AppState> {
    Router::new()
        .route("/slots/selected", get(get_selected_slot).put(select_slot))
        .route("/slots/selected/{layer}", post(paint_selected_slot))
        .route("/slots/{slot}", get(get_slot))
        .route("/slots/{slot}/composite.png", get(composite_png))
        .route(
            "/slots/{slot}/{layer}",
            put(set_slot_layer).delete(clear_slot_layer),
        )
        .route("/slots/{slot}/{layer}/png", get(layer_png))
}

fn build_definition_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/definitions",
            get(export_definitions).post(import_definitions),
        )
        .with_body_limit(state.config.editor.max_upload_bytes)
}

fn build_compiled_routes() -> Router<AppState> {
    Router::new()
        .route("/compiled", get(compile_summary))
        .route("/compiled/tileset.png", get(compiled_sheet_png))
        .route("/compiled/metatiles.bin", get(compiled_metatiles))
        .route("/compiled/palettes/{index}", get(compiled_palette))
}
