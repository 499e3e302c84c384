use crate::models::batch_item::BatchItem;
use crate::state_machine::{ItemStatus, QueueStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate state of a queue.
///
/// `items` order is insertion order and is the processing order.
/// `completed_count + failed_count + pending + processing == items.len()` holds
/// after every public mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueState<P> {
    pub items: Vec<BatchItem<P>>,
    pub status: QueueStatus,
    /// Index of the item being processed; `None` outside an active run
    pub current_index: Option<usize>,
    pub completed_count: usize,
    pub failed_count: usize,
}

impl<P> Default for QueueState<P> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: QueueStatus::Idle,
            current_index: None,
            completed_count: 0,
            failed_count: 0,
        }
    }
}

impl<P> QueueState<P> {
    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn item(&self, id: Uuid) -> Option<&BatchItem<P>> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: Uuid) -> Option<&mut BatchItem<P>> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn count_status(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|item| item.status == status).count()
    }

    /// Recompute the running totals from item statuses
    pub fn recompute_totals(&mut self) {
        self.completed_count = self.count_status(ItemStatus::Completed);
        self.failed_count = self.count_status(ItemStatus::Failed);
    }
}

/// Counts derived by scanning item statuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
    /// Completed share of terminal items, in percent
    pub success_rate: f64,
}

/// Read view of a run in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub current_index: usize,
    pub total_files: usize,
    pub current_file_name: String,
    pub overall_progress: u8,
    pub current_file_progress: u8,
}
