//! Event bus for notifying views about list changes.
//!
//! Controllers publish [`RowListEvent`]s synchronously after each visible
//! change; views subscribe to repaint or to follow the loading flag.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::ListKey;

/// Events published by row list controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowListEvent {
    /// The loading flag flipped.
    LoadingChanged { key: ListKey, is_loading: bool },
    /// Observable fields changed and the view should re-render.
    RepaintRequested { key: ListKey },
    /// A fetch failed; the list was reset to empty.
    LoadFailed { key: ListKey, message: String },
    /// The list state was written to the page state store.
    StateSaved { key: ListKey },
}

impl RowListEvent {
    /// Key of the list that published the event.
    pub fn key(&self) -> &ListKey {
        match self {
            Self::LoadingChanged { key, .. }
            | Self::RepaintRequested { key }
            | Self::LoadFailed { key, .. }
            | Self::StateSaved { key } => key,
        }
    }
}

/// Subscriber ID for unsubscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Event handler function type.
pub type EventHandler = Arc<dyn Fn(&RowListEvent) + Send + Sync>;

/// Event bus for publish-subscribe communication.
///
/// Handlers run synchronously on the publishing thread, outside the bus
/// lock, so a handler may subscribe or unsubscribe.
pub struct EventBus {
    handlers: Arc<Mutex<HashMap<u64, EventHandler>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    fn handlers(&self) -> MutexGuard<'_, HashMap<u64, EventHandler>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to all events.
    ///
    /// Returns a subscriber ID that can be used to unsubscribe.
    pub fn subscribe<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&RowListEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers().insert(id, Arc::new(handler));
        SubscriberId(id)
    }

    /// Unsubscribe from events.
    pub fn unsubscribe(&self, subscriber_id: SubscriberId) {
        self.handlers().remove(&subscriber_id.0);
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: RowListEvent) {
        let handlers: Vec<EventHandler> = self.handlers().values().cloned().collect();
        for handler in handlers {
            handler(&event);
        }
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}
