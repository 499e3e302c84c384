// State machine module for batch items and the aggregate queue.
//
// Statuses are plain enums; items change status only by applying an ItemEvent
// (see models::BatchItem::apply), which validates the transition.

pub mod events;
pub mod states;

pub use events::ItemEvent;
pub use states::{ItemStatus, QueueStatus};
