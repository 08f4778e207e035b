//! Prelude module - commonly used types for convenient import.
//!
//! Use `use toolgate_events::prelude::*;` to import all essential types.

// Bus
pub use crate::{EventBus, EventReceiver};

// Events
pub use crate::{EventMetadata, FailureReason, InvocationInfo, LifecycleEvent};

// Subscribers
pub use crate::{EventSubscriber, FilterSubscriber, LoggingSubscriber, SubscriberId};
