//! Queue data layer: the item store and the progress views derived from it.

pub mod progress;
pub mod store;

pub use progress::{compute_item_progress, compute_progress, compute_stats, overall_percent};
pub use store::QueueStore;
