use axum::{
    Json,
    extract::{Path, State},
};

use crate::incoming::http_axum::{
    dto::responses::{ApiResponse, BinaryFileResponse, PngResponse, TextFileResponse},
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use metatile_application::{
    editor::views::CompileSummary, ports::incoming::editor::CompileUseCase,
};

pub async fn compile_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CompileSummary>>, HttpError> {
    let compile_uc: &dyn CompileUseCase = &*state.compile_service;
    let summary = compile_uc.compile_summary().map_err(HttpError)?;
    Ok(Json(ApiResponse::success_with_data(Some(summary))))
}

pub async fn compiled_sheet_png(State(state): State<AppState>) -> Result<PngResponse, HttpError> {
    let compile_uc: &dyn CompileUseCase = &*state.compile_service;
    let png_data = compile_uc.compiled_sheet_png().map_err(HttpError)?;
    Ok(PngResponse { png_data })
}

pub async fn compiled_metatiles(
    State(state): State<AppState>,
) -> Result<BinaryFileResponse, HttpError> {
    let compile_uc: &dyn CompileUseCase = &*state.compile_service;
    let bytes = compile_uc.compiled_metatiles().map_err(HttpError)?;
    Ok(BinaryFileResponse {
        bytes,
        file_name: "metatiles.bin".to_string(),
    })
}

/// Palette `index` of the compiled output, named `{index}.pal`.
pub async fn compiled_palette(
    Path(index): Path<usize>,
    State(state): State<AppState>,
) -> Result<TextFileResponse, HttpError> {
    let compile_uc: &dyn CompileUseCase = &*state.compile_service;
    let text = compile_uc.compiled_palette(index).map_err(HttpError)?;
    Ok(TextFileResponse {
        text,
        file_name: format!("{index}.pal"),
    })
}
