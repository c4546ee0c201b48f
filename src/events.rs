use tokio::sync::broadcast;

/// Raised after a store has been rewritten. Observers re-read the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    SessionChanged,
    CartUpdated,
    OrdersUpdated,
    CatalogUpdated,
}

/// Fire-and-forget fan-out of [`StoreEvent`]s.
///
/// Emitting with nobody subscribed is fine; a receiver that falls more than
/// `capacity` events behind skips ahead.
#[derive(Debug, Clone)]
pub struct StoreEvents {
    tx: broadcast::Sender<StoreEvent>,
}

impl StoreEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn emit(&self, event: StoreEvent) {
        let delivered = self.tx.send(event).unwrap_or(0);
        tracing::trace!(?event, delivered, "store event");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }
}

impl Default for StoreEvents {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_see_events_in_order() {
        let events = StoreEvents::default();
        events.emit(StoreEvent::CartUpdated);

        let mut rx = events.subscribe();
        events.emit(StoreEvent::SessionChanged);
        events.emit(StoreEvent::OrdersUpdated);

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::SessionChanged);
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::OrdersUpdated);
        assert!(rx.try_recv().is_err());
    }
}
