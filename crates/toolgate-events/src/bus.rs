//! Event bus for lifecycle events.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{trace, warn};

use crate::event::LifecycleEvent;
use crate::subscriber::{EventSubscriber, SubscriberId, SubscriberRegistry};

/// Default channel capacity for the event bus.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Dispatches lifecycle events to broadcast receivers and synchronous
/// subscribers.
///
/// Clones share the same channel and registry.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<Arc<LifecycleEvent>>,
    registry: Arc<SubscriberRegistry>,
    capacity: usize,
}

impl EventBus {
    /// Create a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new event bus with the given broadcast capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            registry: Arc::new(SubscriberRegistry::new()),
            capacity: capacity.max(1),
        }
    }

    /// Emit an event.
    ///
    /// Broadcast receivers get it first; then every synchronous subscriber
    /// is called in registration order before this method returns.
    ///
    /// Returns the number of broadcast receivers that got the event.
    pub fn emit(&self, event: LifecycleEvent) -> usize {
        let event = Arc::new(event);

        trace!(
            event_type = event.event_type(),
            tool = event.tool_name(),
            "Emitting lifecycle event"
        );

        let count = self.sender.send(Arc::clone(&event)).unwrap_or(0);

        self.registry.notify(&event);

        count
    }

    /// Register a synchronous subscriber.
    pub fn register(&self, subscriber: Arc<dyn EventSubscriber>) -> SubscriberId {
        self.registry.register(subscriber)
    }

    /// Unregister a synchronous subscriber.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        self.registry.unregister(id)
    }

    /// Receive all subsequently emitted events.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// The synchronous subscriber registry.
    #[must_use]
    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    /// Broadcast receivers plus synchronous subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender
            .receiver_count()
            .saturating_add(self.registry.len())
    }

    /// Broadcast channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            registry: Arc::clone(&self.registry),
            capacity: self.capacity,
        }
    }
}

/// Async receiver of lifecycle events.
pub struct EventReceiver {
    receiver: broadcast::Receiver<Arc<LifecycleEvent>>,
}

impl EventReceiver {
    /// Wait for the next event. Returns `None` once the bus is gone.
    ///
    /// Events dropped because this receiver lagged are logged and skipped.
    pub async fn recv(&mut self) -> Option<Arc<LifecycleEvent>> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(skipped = count, "Event receiver lagged, events dropped");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next event if one is ready.
    pub fn try_recv(&mut self) -> Option<Arc<LifecycleEvent>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!(skipped = count, "Event receiver lagged, events dropped");
                },
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }
}
