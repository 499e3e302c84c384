//! # Queue Store
//!
//! Owns the ordered item collection and the aggregate run state. The store is
//! plain data with validated mutators; it does no locking and sends no
//! notifications. Callers own both concerns (see
//! [`BatchQueue`](crate::orchestration::BatchQueue)).

use crate::models::{BatchItem, QueueState, WorkPayload};
use crate::state_machine::{ItemEvent, ItemStatus, QueueStatus};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct QueueStore<P> {
    state: QueueState<P>,
}

impl<P> Default for QueueStore<P> {
    fn default() -> Self {
        Self {
            state: QueueState::default(),
        }
    }
}

impl<P: WorkPayload> QueueStore<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one pending item per payload and return the created items
    pub fn enqueue<I>(&mut self, payloads: I) -> Vec<BatchItem<P>>
    where
        I: IntoIterator<Item = P>,
    {
        let created: Vec<BatchItem<P>> = payloads.into_iter().map(BatchItem::new).collect();
        self.state.items.extend(created.iter().cloned());
        debug!(
            added = created.len(),
            total = self.state.items.len(),
            "Enqueued items"
        );
        created
    }
}

impl<P: Clone> QueueStore<P> {
    /// Remove an item. Unknown ids and items currently processing are refused.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(index) = self.state.position(id) else {
            return false;
        };
        if self.state.items[index].status == ItemStatus::Processing {
            warn!(item_id = %id, "Refusing to remove an item that is processing");
            return false;
        }

        self.state.items.remove(index);
        // keep the cursor on the same item when something behind it is removed
        if let Some(current) = self.state.current_index {
            if index < current {
                self.state.current_index = Some(current - 1);
            }
        }
        self.state.recompute_totals();
        true
    }

    /// Reset to the empty idle state. Ignored while a run is processing.
    pub fn clear(&mut self) -> bool {
        if self.is_running() {
            warn!(status = %self.state.status, "Ignoring clear while the queue is processing");
            return false;
        }
        self.reset();
        true
    }

    /// Unconditional reset to the empty idle state
    pub fn reset(&mut self) {
        self.state = QueueState::default();
    }

    pub fn get(&self, id: Uuid) -> Option<BatchItem<P>> {
        self.state.item(id).cloned()
    }

    pub fn list(&self) -> Vec<BatchItem<P>> {
        self.state.items.clone()
    }

    pub fn list_by_status(&self, status: ItemStatus) -> Vec<BatchItem<P>> {
        self.state
            .items
            .iter()
            .filter(|item| item.status == status)
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> QueueState<P> {
        self.state.clone()
    }

    /// Id of the item at `index` in the live ordering
    pub fn id_at(&self, index: usize) -> Option<Uuid> {
        self.state.items.get(index).map(|item| item.id)
    }

    /// Apply a lifecycle event to one item and refresh the totals.
    /// Returns the updated item, or `None` if the id is unknown or the event was
    /// rejected.
    pub fn apply(&mut self, id: Uuid, event: ItemEvent) -> Option<BatchItem<P>> {
        let item = self.state.item_mut(id)?;
        let event_type = event.event_type();
        if !item.apply(event) {
            return None;
        }
        let updated = item.clone();
        if event_type != "progress" {
            debug!(item_id = %id, event = event_type, status = %updated.status, "Item transition");
            self.state.recompute_totals();
        }
        Some(updated)
    }

    /// Prepare every item for a fresh run and mark the queue as processing
    pub fn begin_run(&mut self) {
        for item in &mut self.state.items {
            item.apply(ItemEvent::Reset);
        }
        self.state.status = QueueStatus::Processing;
        self.state.current_index = Some(0);
        self.state.completed_count = 0;
        self.state.failed_count = 0;
    }

    pub fn set_current_index(&mut self, index: Option<usize>) {
        self.state.current_index = index;
    }

    /// Close a run: `Cancelled` if the run was signalled, otherwise `Completed`
    pub fn finish_run(&mut self, cancelled: bool) {
        self.state.status = if cancelled {
            QueueStatus::Cancelled
        } else {
            QueueStatus::Completed
        };
        self.state.current_index = None;
        self.state.recompute_totals();
    }

    /// Mark the queue cancelled and put unfinished items back to pending.
    /// Completed and failed items keep their terminal status.
    pub fn cancel_items(&mut self) {
        self.state.status = QueueStatus::Cancelled;
        for item in &mut self.state.items {
            if matches!(item.status, ItemStatus::Pending | ItemStatus::Processing) {
                item.apply(ItemEvent::Requeue);
            }
        }
        self.state.current_index = None;
        self.state.recompute_totals();
    }

    pub fn pause(&mut self) -> bool {
        if self.state.status != QueueStatus::Processing {
            return false;
        }
        self.state.status = QueueStatus::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state.status != QueueStatus::Paused {
            return false;
        }
        self.state.status = QueueStatus::Processing;
        true
    }
}

impl<P> QueueStore<P> {
    pub fn state(&self) -> &QueueState<P> {
        &self.state
    }

    pub fn status(&self) -> QueueStatus {
        self.state.status
    }

    pub fn recompute_totals(&mut self) {
        self.state.recompute_totals();
    }

    /// A run is in flight, whether or not its reported status is paused
    pub fn is_running(&self) -> bool {
        matches!(
            self.state.status,
            QueueStatus::Processing | QueueStatus::Paused
        )
    }

    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }
}
