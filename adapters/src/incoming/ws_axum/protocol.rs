use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use domain::{events::SlotChangedEvent, metatile::SlotIndex};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum WSMessage {
    /// `composite` is the slot's 16x16 RGBA8 composite, row-major, base64.
    #[serde(rename = "slot-changed")]
    SlotChanged { slot: SlotIndex, composite: String },
    #[serde(rename = "error")]
    Error { message: String },
    #[serde(rename = "pong")]
    Pong,
}

impl WSMessage {
    pub fn slot_changed(event: &SlotChangedEvent) -> Self {
        Self::SlotChanged {
            slot: event.slot,
            composite: STANDARD.encode(event.composite.as_bytes()),
        }
    }

    pub fn error(message: String) -> Self {
        Self::Error { message }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "ping")]
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::pixels::{Rgba, TILE_BYTES, TileBuffer};
    use serde_json::Value;

    #[test]
    fn slot_changed_carries_composite_pixels() {
        let mut composite = TileBuffer::sentinel();
        composite.set_pixel(0, 0, Rgba::new(1, 2, 3, 4));
        let event = SlotChangedEvent {
            slot: SlotIndex::new(17).unwrap(),
            composite: composite.clone(),
        };

        let json: Value = serde_json::to_value(WSMessage::slot_changed(&event)).unwrap();
        assert_eq!(json["type"], "slot-changed");
        assert_eq!(json["slot"], 17);

        let pixels = STANDARD.decode(json["composite"].as_str().unwrap()).unwrap();
        assert_eq!(pixels.len(), TILE_BYTES);
        assert_eq!(pixels, composite.as_bytes());
        assert_eq!(&pixels[..8], &[1, 2, 3, 4, 255, 0, 253, 255]);
    }

    #[test]
    fn parses_client_ping() {
        let message: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(message, ClientMessage::Ping);
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"subscribe"}"#).is_err());
    }
}
