use domain::{
    definition::UnsetLayerEncoding,
    metatile::SLOT_COUNT,
    pixels::TILE_SIZE,
};
use metatile_application::infrastructure_config::{Config, EditorConfig, WebSocketConfig};
use tracing::info;

pub fn print_api_info(config: &Config) {
    print_route_info(config);
    print_configuration_info(config);
}

#[allow(clippy::cognitive_complexity)]
fn print_route_info(config: &Config) {
    let base_url = format!("http://{}", config.server_address());
    info!("📋 Editor endpoints:");
    info!("  🖼️  Tilesets: {}/tilesets", base_url);
    info!("  🧩 Slots: {}/slots/{{slot}}", base_url);
    info!("  🗺️  Sheet: {}/sheet.png", base_url);
    info!("  📄 Definitions: {}/definitions", base_url);
    info!("  🔌 Live updates: ws://{}/live", config.server_address());
}

fn print_configuration_info(config: &Config) {
    info!("⚙️  Configuration:");
    print_editor_configuration(&config.editor);
    print_websocket_configuration(&config.websocket);
}

fn print_editor_configuration(editor: &EditorConfig) {
    info!(
        "  📐 {} slots of {}x{} tiles, two layers each",
        SLOT_COUNT, TILE_SIZE, TILE_SIZE
    );
    let unset = match editor.unset_layers {
        UnsetLayerEncoding::FirstTileset => "first tileset alias, tile 0",
        UnsetLayerEncoding::Explicit => "explicit '-' marker",
    };
    info!("  📝 Unset layers export as: {}", unset);
    info!(
        "  💾 Export file: {}, upload limit {} bytes",
        editor.export_file_name, editor.max_upload_bytes
    );
}

fn print_websocket_configuration(websocket: &WebSocketConfig) {
    match websocket.max_connections {
        Some(max) => info!(
            "  📡 WebSocket: buffer {}, max {} connections",
            websocket.broadcast_buffer_size, max
        ),
        None => info!(
            "  📡 WebSocket: buffer {}, unlimited connections",
            websocket.broadcast_buffer_size
        ),
    }
}
