/*
[INPUT]:  Adapter events and subscribing handlers
[OUTPUT]: Fan-out to live handlers; RAII subscription handles
[POS]:    Adapter layer - listener registry embedded by adapters
[UPDATE]: When changing delivery guarantees or handler isolation
*/

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::{debug, warn};

use crate::types::AdapterEvent;

/// Callback invoked for every event an adapter emits
pub type EventHandler = Arc<dyn Fn(&AdapterEvent) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(u64, EventHandler)>>,
}

impl Listeners {
    fn lock(&self) -> MutexGuard<'_, Vec<(u64, EventHandler)>> {
        self.handlers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn remove(&self, id: u64) -> bool {
        let mut handlers = self.lock();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }
}

/// Listener registry for adapter events.
///
/// Handlers run outside the internal lock, so a handler may subscribe or drop
/// subscriptions without deadlocking. A panicking handler is logged and skipped.
#[derive(Default)]
pub struct AdapterEventEmitter {
    listeners: Arc<Listeners>,
}

impl AdapterEventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. It is removed when the returned handle is dropped.
    pub fn on(&self, handler: EventHandler) -> Subscription {
        let id = self.listeners.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, handler));
        Subscription {
            listeners: Arc::downgrade(&self.listeners),
            id,
        }
    }

    /// Deliver an event to every handler registered at call time.
    ///
    /// Returns the number of handlers that completed without panicking.
    pub fn emit(&self, event: AdapterEvent) -> usize {
        let handlers: Vec<EventHandler> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        let mut delivered = 0;
        for handler in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(()) => delivered += 1,
                Err(_) => warn!(event = %event.kind(), "adapter event handler panicked"),
            }
        }
        delivered
    }

    /// Number of handlers currently attached
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl std::fmt::Debug for AdapterEventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterEventEmitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle for one attached handler; detaches it on drop
#[must_use = "dropping a Subscription immediately detaches its handler"]
#[derive(Debug)]
pub struct Subscription {
    listeners: Weak<Listeners>,
    id: u64,
}

impl Subscription {
    /// Detach the handler now
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Whether the handler is still attached to a live emitter
    pub fn is_active(&self) -> bool {
        match self.listeners.upgrade() {
            Some(listeners) => {
                let handlers = listeners.lock();
                handlers.iter().any(|(id, _)| *id == self.id)
            }
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if listeners.remove(self.id) {
                debug!(subscription_id = self.id, "adapter listener detached");
            }
        }
    }
}
