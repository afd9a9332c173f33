use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};

use crate::incoming::http_axum::{
    core::extractors::parse_tileset_id,
    dto::responses::{ApiResponse, TextFileResponse},
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use metatile_application::{
    editor::views::TilesetSummary,
    ports::incoming::editor::{CompileUseCase, TilesetUseCase},
};

pub async fn list_tilesets(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TilesetSummary>>>, HttpError> {
    let tileset_uc: &dyn TilesetUseCase = &*state.tileset_service;
    let tilesets = tileset_uc.list_tilesets().map_err(HttpError)?;
    Ok(Json(ApiResponse::success_with_data(Some(tilesets))))
}

/// Registers the raw request body as a tileset under `file_name`.
pub async fn upload_tileset(
    Path(file_name): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<TilesetSummary>>), HttpError> {
    let tileset_uc: &dyn TilesetUseCase = &*state.tileset_service;
    let summary = tileset_uc
        .upload_tileset(&file_name, &body)
        .map_err(HttpError)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_data(Some(summary))),
    ))
}

/// The tileset's indexed palette as a JASC-PAL file.
pub async fn tileset_palette(
    Path(raw_id): Path<String>,
    State(state): State<AppState>,
) -> Result<TextFileResponse, HttpError> {
    let tileset_id = parse_tileset_id(&raw_id)?;
    let compile_uc: &dyn CompileUseCase = &*state.compile_service;
    let text = compile_uc.tileset_palette(&tileset_id).map_err(HttpError)?;
    Ok(TextFileResponse {
        text,
        file_name: format!("{tileset_id}.pal"),
    })
}
