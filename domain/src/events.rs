use crate::{metatile::SlotIndex, pixels::TileBuffer};

/// Emitted after a slot's layers change through set, clear or import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotChangedEvent {
    pub slot: SlotIndex,
    pub composite: TileBuffer,
}
