use crate::error::AppResult;
use domain::events::SlotChangedEvent;
use std::sync::Arc;

pub trait SlotEventsPort: Send + Sync {
    fn slot_changed(&self, event: SlotChangedEvent) -> AppResult<()>;
}

pub type DynSlotEventsPort = Arc<dyn SlotEventsPort>;
