use axum::{
    Json,
    extract::{Path, State},
};
use axum_valid::Valid;

use crate::incoming::http_axum::{
    core::extractors::{
        SlotLayerPath, SlotPath, extract_slot, extract_slot_layer, parse_tileset_id,
    },
    dto::{
        requests::{PaintLayerRequest, SelectSlotRequest, SetLayerRequest},
        responses::{ApiResponse, SelectedSlotResponse},
    },
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use domain::metatile::{Layer, SlotIndex};
use metatile_application::{
    editor::views::{PaintTarget, SlotSnapshot},
    error::AppError,
    ports::incoming::editor::SlotEditUseCase,
};

type SnapshotResponse = Result<Json<ApiResponse<SlotSnapshot>>, HttpError>;

fn snapshot_response(snapshot: SlotSnapshot) -> Json<ApiResponse<SlotSnapshot>> {
    Json(ApiResponse::success_with_data(Some(snapshot)))
}

pub async fn get_selected_slot(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SelectedSlotResponse>>, HttpError> {
    let slot_uc: &dyn SlotEditUseCase = &*state.slot_service;
    let selected = slot_uc.selected_slot().map_err(HttpError)?;
    Ok(Json(ApiResponse::success_with_data(Some(
        SelectedSlotResponse {
            slot: selected.map(usize::from),
        },
    ))))
}

pub async fn select_slot(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<SelectSlotRequest>>,
) -> SnapshotResponse {
    let slot = SlotIndex::new(request.slot).map_err(|e| HttpError(AppError::from(e)))?;
    let slot_uc: &dyn SlotEditUseCase = &*state.slot_service;
    let snapshot = slot_uc.select_slot(slot).map_err(HttpError)?;
    Ok(snapshot_response(snapshot))
}

/// Paints one layer of the selected slot from a click on a tileset preview.
pub async fn paint_selected_slot(
    Path(layer): Path<Layer>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<PaintLayerRequest>>,
) -> SnapshotResponse {
    let target = PaintTarget {
        tileset_id: parse_tileset_id(&request.tileset_id)?,
        x: request.x,
        y: request.y,
        display_size: request.display_size(),
    };

    let slot_uc: &dyn SlotEditUseCase = &*state.slot_service;
    let snapshot = slot_uc.paint_layer(layer, target).map_err(HttpError)?;
    Ok(snapshot_response(snapshot))
}

pub async fn get_slot(path: SlotPath, State(state): State<AppState>) -> SnapshotResponse {
    let slot = extract_slot(path)?;
    let slot_uc: &dyn SlotEditUseCase = &*state.slot_service;
    let snapshot = slot_uc.slot(slot).map_err(HttpError)?;
    Ok(snapshot_response(snapshot))
}

pub async fn set_slot_layer(
    path: SlotLayerPath,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<SetLayerRequest>>,
) -> SnapshotResponse {
    let (slot, layer) = extract_slot_layer(path)?;
    let tileset_id = parse_tileset_id(&request.tileset_id)?;

    let slot_uc: &dyn SlotEditUseCase = &*state.slot_service;
    let snapshot = slot_uc
        .set_slot_layer(slot, layer, &tileset_id, request.tile_index)
        .map_err(HttpError)?;
    Ok(snapshot_response(snapshot))
}

pub async fn clear_slot_layer(path: SlotLayerPath, State(state): State<AppState>) -> SnapshotResponse {
    let (slot, layer) = extract_slot_layer(path)?;
    let slot_uc: &dyn SlotEditUseCase = &*state.slot_service;
    let snapshot = slot_uc.clear_slot_layer(slot, layer).map_err(HttpError)?;
    Ok(snapshot_response(snapshot))
}
