pub mod dispatcher;
pub mod publisher;

// Re-export key types for convenience
pub use dispatcher::{CallbackDispatcher, QueueCallbacks, QueueObserver};
pub use publisher::{EventPublisher, PublishedEvent, QueueEvent};
