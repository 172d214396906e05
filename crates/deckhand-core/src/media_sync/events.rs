//! Observer registry for media sync.
//!
//! Every subscriber gets its own unbounded channel, so no event is dropped
//! for a slow reader and each reader sees events in emission order.

use tokio::sync::mpsc;

use super::log::SyncLogEntry;

/// Events emitted by the media sync controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSyncEvent {
    /// An entry was appended to the sync log
    LogAppended(SyncLogEntry),
    /// Sync started (`true`) or stopped (`false`)
    StartedOrStopped(bool),
    /// A message the user should see
    Alert(String),
}

/// Receiving end of a subscription
pub type EventStream = mpsc::UnboundedReceiver<MediaSyncEvent>;

#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<mpsc::UnboundedSender<MediaSyncEvent>>,
}

impl EventBus {
    pub fn subscribe(&mut self) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver an event to every live subscriber, forgetting dropped ones
    pub fn emit(&mut self, event: &MediaSyncEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
