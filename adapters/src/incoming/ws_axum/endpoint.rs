use axum::{
    extract::{State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::shared::app_state::AppState;

use super::handler::ConnectionHandler;

/// Upgrades to a WebSocket that pushes a `slot-changed` message, with the
/// slot's new composite, whenever its layers are set, cleared or imported.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    if !state.check_websocket_connection_limit() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "Maximum WebSocket connections reached",
        )
            .into_response();
    }

    ws.on_upgrade(move |socket| ConnectionHandler::new(socket, &state).run())
}
