pub mod events_broadcast;
pub mod image_rs;
