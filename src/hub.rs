use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::events::ChangeEvent;

/// Registry of connected change-feed subscribers.
///
/// Each subscriber owns the receiving half of an unbounded channel; the
/// WebSocket write happens in the connection's own forwarding task, so
/// broadcasting never performs I/O while the registry lock is held. Delivery
/// is best-effort: a subscriber whose receiving side is gone is pruned
/// silently, and events are never queued for clients that connect later.
pub struct NotificationHub {
    subscribers: Mutex<HashMap<Uuid, mpsc::UnboundedSender<String>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    /// Register a new subscriber, returning its handle and the event stream.
    pub fn subscribe(&self) -> (Uuid, mpsc::UnboundedReceiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().insert(id, tx);
        (id, rx)
    }

    /// Remove a subscriber. Safe to call for an already-removed handle.
    pub fn unsubscribe(&self, id: &Uuid) {
        self.subscribers.lock().remove(id);
    }

    /// Serialize `event` once and deliver it to every live subscriber,
    /// dropping any whose channel has closed.
    pub fn broadcast(&self, event: &ChangeEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.subscribers
                .lock()
                .retain(|_, tx| tx.send(payload.clone()).is_ok());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
