//! # System Constants
//!
//! Event names published on the queue event bus and default configuration values.

/// Queue lifecycle events, mirrored onto the broadcast bus
pub mod events {
    pub const QUEUE_STATE_CHANGED: &str = "queue.state_changed";
    pub const QUEUE_PROGRESS: &str = "queue.progress";
    pub const ITEM_COMPLETED: &str = "item.completed";
    pub const ITEM_FAILED: &str = "item.failed";
    pub const BATCH_COMPLETED: &str = "batch.completed";
}

/// Default configuration values
pub mod defaults {
    /// Reserved; the run loop is strictly sequential regardless of this value
    pub const CONCURRENCY_LIMIT: usize = 1;
    pub const EVENT_CHANNEL_CAPACITY: usize = 1000;
}

/// Environment variable names recognised by configuration and logging
pub mod env {
    pub const PREFIX: &str = "DOCQUEUE";
    pub const CONCURRENCY_LIMIT: &str = "DOCQUEUE_CONCURRENCY_LIMIT";
    pub const EVENT_CHANNEL_CAPACITY: &str = "DOCQUEUE_EVENT_CHANNEL_CAPACITY";
    pub const ENVIRONMENT: &str = "DOCQUEUE_ENV";
    pub const LOG_FILTER: &str = "DOCQUEUE_LOG";
    pub const LOG_FORMAT: &str = "DOCQUEUE_LOG_FORMAT";
}

/// Upper bound for a single item's progress
pub const PROGRESS_MAX: u8 = 100;
