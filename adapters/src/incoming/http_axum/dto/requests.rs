use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use domain::metatile::SLOT_COUNT;

const MAX_SLOT: usize = SLOT_COUNT - 1;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SelectSlotRequest {
    #[validate(range(max = MAX_SLOT))]
    pub slot: usize,
}

/// A click on the tileset preview. When the preview is drawn scaled, both
/// `display_width` and `display_height` carry its rendered size.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_display_size"))]
pub struct PaintLayerRequest {
    #[validate(length(min = 1, max = 256))]
    pub tileset_id: String,
    #[validate(range(min = 0.0))]
    pub x: f64,
    #[validate(range(min = 0.0))]
    pub y: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub display_width: Option<f64>,
    #[validate(range(exclusive_min = 0.0))]
    pub display_height: Option<f64>,
}

impl PaintLayerRequest {
    #[must_use]
    pub fn display_size(&self) -> Option<(f64, f64)> {
        self.display_width.zip(self.display_height)
    }
}

fn validate_display_size(request: &PaintLayerRequest) -> Result<(), ValidationError> {
    if request.display_width.is_some() != request.display_height.is_some() {
        return Err(ValidationError::new("display_size_incomplete"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetLayerRequest {
    #[validate(length(min = 1, max = 256))]
    pub tileset_id: String,
    pub tile_index: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_rejects_slots_past_the_bank() {
        assert!(SelectSlotRequest { slot: 127 }.validate().is_ok());
        assert!(SelectSlotRequest { slot: 128 }.validate().is_err());
    }

    #[test]
    fn display_size_must_be_complete_and_positive() {
        let mut request = PaintLayerRequest {
            tileset_id: "tilespng".to_string(),
            x: 4.0,
            y: 4.0,
            display_width: Some(64.0),
            display_height: None,
        };
        assert!(request.validate().is_err());

        request.display_height = Some(32.0);
        assert!(request.validate().is_ok());
        assert_eq!(request.display_size(), Some((64.0, 32.0)));

        request.display_width = Some(0.0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn negative_click_is_rejected() {
        let request = PaintLayerRequest {
            tileset_id: "a".to_string(),
            x: -1.0,
            y: 0.0,
            display_width: None,
            display_height: None,
        };
        assert!(request.validate().is_err());
    }
}
