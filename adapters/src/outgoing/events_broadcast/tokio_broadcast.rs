use tokio::sync::broadcast::Sender;
use tracing::{trace, warn};

use domain::events::SlotChangedEvent;
use metatile_application::{
    error::{AppError, AppResult},
    ports::outgoing::slot_events::SlotEventsPort,
};

pub struct TokioBroadcastSlotEventsAdapter {
    tx: Sender<SlotChangedEvent>,
}

impl TokioBroadcastSlotEventsAdapter {
    pub fn new(tx: Sender<SlotChangedEvent>) -> Self {
        Self { tx }
    }
}

impl SlotEventsPort for TokioBroadcastSlotEventsAdapter {
    fn slot_changed(&self, event: SlotChangedEvent) -> AppResult<()> {
        if self.tx.receiver_count() == 0 {
            trace!(slot = %event.slot, "No live subscribers for slot change");
            return Ok(());
        }
        self.tx.send(event).map_err(|e| {
            warn!("Failed to broadcast slot change event: {}", e);
            AppError::WebSocketError {
                message: format!("Broadcast send failed: {}", e),
            }
        })?;
        Ok(())
    }
}
