use axum::extract::Path;
use std::str::FromStr;

use crate::incoming::http_axum::error_mapper::HttpError;
use domain::{
    metatile::{Layer, SlotIndex},
    tileset::TilesetId,
};
use metatile_application::error::AppError;

pub type SlotPath = Path<usize>;
pub type SlotLayerPath = Path<(usize, Layer)>;

pub fn extract_slot(Path(index): SlotPath) -> Result<SlotIndex, HttpError> {
    SlotIndex::new(index).map_err(|e| HttpError(AppError::from(e)))
}

pub fn extract_slot_layer(Path((index, layer)): SlotLayerPath) -> Result<(SlotIndex, Layer), HttpError> {
    let slot = SlotIndex::new(index).map_err(|e| HttpError(AppError::from(e)))?;
    Ok((slot, layer))
}

pub fn parse_tileset_id(raw: &str) -> Result<TilesetId, HttpError> {
    TilesetId::from_str(raw).map_err(|e| HttpError(AppError::from(e)))
}
