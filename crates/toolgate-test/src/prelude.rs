//! Prelude module - commonly used test helpers.
//!
//! Use `use toolgate_test::prelude::*;` in test modules.

pub use crate::fixtures::{
    admin_descriptor, create_node_descriptor, delete_node_descriptor, init_test_logging,
    read_descriptor, test_config, write_descriptor,
};
pub use crate::logs::{LogCapture, capture_logs};
pub use crate::mocks::{
    FailingAuditStorage, FailingFactory, FailingTool, HangingTool, MockTool, PanickingSubscriber,
    PanickingTool, RecordingSubscriber,
};
