pub mod image_codec;
pub mod slot_events;
