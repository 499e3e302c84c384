pub mod batch_item;
pub mod payload;
pub mod queue_state;

// Re-export core models for easy access
pub use batch_item::BatchItem;
pub use payload::{FileRef, WorkPayload};
pub use queue_state::{ProgressSnapshot, QueueState, QueueStats};
