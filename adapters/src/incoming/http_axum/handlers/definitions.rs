use axum::{Json, extract::State};

use crate::incoming::http_axum::{
    dto::responses::{ApiResponse, TextFileResponse},
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use metatile_application::{
    editor::views::ImportSummary, ports::incoming::editor::DefinitionUseCase,
};

pub async fn export_definitions(
    State(state): State<AppState>,
) -> Result<TextFileResponse, HttpError> {
    let definition_uc: &dyn DefinitionUseCase = &*state.definition_service;
    let text = definition_uc.export_text().map_err(HttpError)?;
    Ok(TextFileResponse {
        text,
        file_name: state.config.editor.export_file_name.clone(),
    })
}

/// Replaces slots from a definition file. A failing line rejects the whole
/// file and the error body names the line.
pub async fn import_definitions(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ApiResponse<ImportSummary>>, HttpError> {
    let definition_uc: &dyn DefinitionUseCase = &*state.definition_service;
    let summary = definition_uc.import_text(&body).map_err(HttpError)?;
    Ok(Json(ApiResponse::success_with_data(Some(summary))))
}
