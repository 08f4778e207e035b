//! Toolgate Events - lifecycle events for tool executions.
//!
//! This crate provides:
//! - [`LifecycleEvent`]: `Started`, `Succeeded`, and `Failed` notifications
//! - [`SubscriberRegistry`]: ordered, panic-isolated synchronous subscribers
//! - [`EventBus`]: synchronous dispatch plus broadcast receivers
//! - [`LoggingSubscriber`]: writes every event to `tracing`
//!
//! # Architecture
//!
//! The gateway emits one `Started` event before running a tool and exactly one
//! terminal event afterwards. There are two ways to observe them:
//!
//! 1. **Async receivers**: `bus.subscribe()` returns an [`EventReceiver`].
//! 2. **Synchronous subscribers**: implement [`EventSubscriber`] and register
//!    it; subscribers run in registration order on the emitting task, and a
//!    panicking subscriber is logged and skipped.
//!
//! # Example
//!
//! ```rust
//! use serde_json::Map;
//! use toolgate_events::{EventBus, EventMetadata, InvocationInfo, LifecycleEvent};
//!
//! # async fn example() {
//! let bus = EventBus::new();
//! let mut receiver = bus.subscribe();
//!
//! bus.emit(LifecycleEvent::Started {
//!     metadata: EventMetadata::new("gateway"),
//!     invocation: InvocationInfo::new("mcp-tools___get-status", "mcp-tools:get-status", Map::new()),
//! });
//!
//! let event = receiver.recv().await.unwrap();
//! assert_eq!(event.event_type(), "started");
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod bus;
mod event;
mod logging;
mod subscriber;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventReceiver};
pub use event::{EventMetadata, FailureReason, InvocationInfo, LifecycleEvent};
pub use logging::{DEFAULT_MAX_RESULT_CHARS, LoggingSubscriber};
pub use subscriber::{
    EventFilter, EventSubscriber, FilterSubscriber, SubscriberId, SubscriberRegistry,
};
