//! Event subscriber trait and registry.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::event::LifecycleEvent;

/// Filter function type for event subscribers.
pub type EventFilter = Box<dyn Fn(&LifecycleEvent) -> bool + Send + Sync>;

/// Trait for synchronous event subscribers.
///
/// `on_event` runs on the emitting task, before the gateway returns its
/// response, so it should be quick. A panic inside it is caught by the
/// registry and never reaches the gateway.
pub trait EventSubscriber: Send + Sync {
    /// Called for every accepted event.
    fn on_event(&self, event: &LifecycleEvent);

    /// Return `false` to skip an event. Accepts everything by default.
    fn accepts(&self, event: &LifecycleEvent) -> bool {
        let _ = event;
        true
    }

    /// Name used in diagnostics.
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "anonymous"
    }
}

/// Registration handle for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

type Entry = (SubscriberId, Arc<dyn EventSubscriber>);

/// Ordered registry of synchronous subscribers.
///
/// Subscribers are notified in registration order.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: RwLock<Vec<Entry>>,
}

impl std::fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("subscriber_count", &self.len())
            .finish()
    }
}

impl SubscriberRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber at the end of the notification order.
    pub fn register(&self, subscriber: Arc<dyn EventSubscriber>) -> SubscriberId {
        let id = SubscriberId::new();
        let name = subscriber.name().to_owned();

        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, subscriber));

        debug!(subscriber_name = %name, "Subscriber registered");
        id
    }

    /// Unregister a subscriber. Returns `true` if it was registered.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let mut subs = self.subscribers.write().unwrap_or_else(PoisonError::into_inner);
        let before = subs.len();
        subs.retain(|(existing, _)| *existing != id);
        let removed = subs.len() != before;

        if removed {
            debug!("Subscriber unregistered");
        }
        removed
    }

    /// Deliver `event` to every accepting subscriber, in order.
    ///
    /// A subscriber whose filter or handler panics is logged at `warn` and
    /// delivery continues with the next one.
    pub fn notify(&self, event: &LifecycleEvent) {
        // Snapshot so subscribers may (un)register without deadlocking.
        let snapshot: Vec<Entry> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for (id, subscriber) in &snapshot {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                if !subscriber.accepts(event) {
                    return;
                }
                trace!(
                    subscriber_name = %subscriber.name(),
                    event_type = event.event_type(),
                    "Notifying subscriber"
                );
                subscriber.on_event(event);
            }));

            if let Err(payload) = result {
                warn!(
                    subscriber_id = ?id,
                    subscriber_name = %subscriber.name(),
                    event_type = event.event_type(),
                    tool = event.tool_name(),
                    panic = panic_message(payload.as_ref()),
                    "Subscriber panicked"
                );
            }
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no subscribers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every subscriber.
    pub fn clear(&self) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        debug!("All subscribers cleared");
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// A closure-backed subscriber with an optional filter.
pub struct FilterSubscriber<F>
where
    F: Fn(&LifecycleEvent) + Send + Sync,
{
    name: String,
    filter: Option<EventFilter>,
    handler: F,
}

impl<F> FilterSubscriber<F>
where
    F: Fn(&LifecycleEvent) + Send + Sync,
{
    /// Create a subscriber that calls `handler` for every event.
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            filter: None,
            handler,
        }
    }

    /// Only deliver events matching `predicate`.
    #[must_use]
    pub fn with_filter<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&LifecycleEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }
}

impl<F> EventSubscriber for FilterSubscriber<F>
where
    F: Fn(&LifecycleEvent) + Send + Sync,
{
    fn on_event(&self, event: &LifecycleEvent) {
        (self.handler)(event);
    }

    fn accepts(&self, event: &LifecycleEvent) -> bool {
        self.filter.as_ref().is_none_or(|f| f(event))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
