use axum::extract::State;

use crate::incoming::http_axum::{
    core::extractors::{SlotLayerPath, SlotPath, extract_slot, extract_slot_layer},
    dto::responses::PngResponse,
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use metatile_application::ports::incoming::editor::RenderUseCase;

pub async fn composite_png(
    path: SlotPath,
    State(state): State<AppState>,
) -> Result<PngResponse, HttpError> {
    let slot = extract_slot(path)?;
    let render_uc: &dyn RenderUseCase = &*state.render_service;
    let png_data = render_uc.composite_png(slot).map_err(HttpError)?;
    Ok(PngResponse { png_data })
}

pub async fn layer_png(
    path: SlotLayerPath,
    State(state): State<AppState>,
) -> Result<PngResponse, HttpError> {
    let (slot, layer) = extract_slot_layer(path)?;
    let render_uc: &dyn RenderUseCase = &*state.render_service;
    let png_data = render_uc.layer_png(slot, layer).map_err(HttpError)?;
    Ok(PngResponse { png_data })
}

/// All 128 composites on one 128x256 sheet.
pub async fn sheet_png(State(state): State<AppState>) -> Result<PngResponse, HttpError> {
    let render_uc: &dyn RenderUseCase = &*state.render_service;
    let png_data = render_uc.sheet_png().map_err(HttpError)?;
    Ok(PngResponse { png_data })
}
