pub mod addressing;
pub mod compile;
pub mod compositor;
pub mod definition;
pub mod error;
pub mod events;
pub mod extract;
pub mod metatile;
pub mod palette;
pub mod pixels;
pub mod tileset;
