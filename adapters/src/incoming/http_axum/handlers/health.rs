use axum::{Json, extract::State};

use crate::incoming::http_axum::{
    dto::responses::{ApiResponse, HealthResponse},
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use metatile_application::ports::incoming::editor::EditorStatusQuery;

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthResponse>>, HttpError> {
    let status_uc: &dyn EditorStatusQuery = &*state.status_query;
    let status = status_uc.status().map_err(HttpError)?;

    Ok(Json(ApiResponse::success_with_data(Some(HealthResponse {
        status: "ok",
        environment: state.config.environment.env.clone(),
        tilesets: status.tilesets,
        assigned_slots: status.assigned_slots,
        selected_slot: status.selected.map(usize::from),
        live_connections: state.get_websocket_connection_count(),
    }))))
}
