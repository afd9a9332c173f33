pub mod compiled;
pub mod definitions;
pub mod health;
pub mod images;
pub mod slots;
pub mod tilesets;
