//! # Batch Queue
//!
//! Caller-owned handle over one queue instance. Cloning the handle shares the
//! same queue; there is no process-wide instance. Tear down with
//! [`BatchQueue::destroy`].
//!
//! ## Usage
//!
//! ```rust
//! use docqueue_core::orchestration::{processor_fn, BatchQueue, ProgressReporter};
//! use docqueue_core::{ItemStatus, ProcessorError, QueueStatus};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let queue: BatchQueue<String> = BatchQueue::new();
//! queue.set_processor(processor_fn(|name: String, progress: ProgressReporter| async move {
//!     progress.report(50);
//!     Ok::<_, ProcessorError>(json!({ "file": name }))
//! }));
//!
//! queue.enqueue(vec!["contract.pdf".to_string(), "invoice.docx".to_string()]);
//! let items = queue.run().await.unwrap();
//!
//! assert_eq!(queue.get_state().status, QueueStatus::Completed);
//! assert!(items.iter().all(|item| item.status == ItemStatus::Completed));
//! # });
//! ```
//!
//! ## Concurrency contract
//!
//! Only [`run`](BatchQueue::run) is guarded against re-entry. Retries are not
//! guarded against an active run or against each other; callers serialize
//! run-triggering operations.

use super::core::QueueCore;
use super::processor::ItemProcessor;
use crate::config::QueueConfig;
use crate::error::Result;
use crate::events::{PublishedEvent, QueueObserver};
use crate::models::{BatchItem, ProgressSnapshot, QueueState, QueueStats, WorkPayload};
use crate::queue::{compute_progress, compute_stats};
use crate::state_machine::ItemStatus;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

pub struct BatchQueue<P> {
    core: Arc<QueueCore<P>>,
}

impl<P> Clone for BatchQueue<P> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<P: WorkPayload> Default for BatchQueue<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: WorkPayload> BatchQueue<P> {
    pub fn new() -> Self {
        Self {
            core: Arc::new(QueueCore::new(QueueConfig::default())),
        }
    }

    /// Create a queue with explicit settings, rejecting invalid ones
    pub fn with_config(config: QueueConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            core: Arc::new(QueueCore::new(config)),
        })
    }

    pub fn config(&self) -> &QueueConfig {
        &self.core.config
    }

    // ----- queue management -----

    pub fn enqueue<I>(&self, payloads: I) -> Vec<BatchItem<P>>
    where
        I: IntoIterator<Item = P>,
    {
        let created = self.core.state.lock().store.enqueue(payloads);
        self.core.emit_state_change();
        created
    }

    /// Remove an item; `false` if unknown or currently processing
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.core.state.lock().store.remove(id);
        if removed {
            self.core.emit_state_change();
        }
        removed
    }

    /// Empty the queue; silently ignored while a run is processing
    pub fn clear(&self) {
        let cleared = self.core.state.lock().store.clear();
        if cleared {
            self.core.emit_state_change();
        }
    }

    pub fn get(&self, id: Uuid) -> Option<BatchItem<P>> {
        self.core.state.lock().store.get(id)
    }

    pub fn list(&self) -> Vec<BatchItem<P>> {
        self.core.state.lock().store.list()
    }

    pub fn list_by_status(&self, status: ItemStatus) -> Vec<BatchItem<P>> {
        self.core.state.lock().store.list_by_status(status)
    }

    pub fn get_state(&self) -> QueueState<P> {
        self.core.state.lock().store.snapshot()
    }

    pub fn get_stats(&self) -> QueueStats {
        compute_stats(self.core.state.lock().store.state())
    }

    pub fn get_progress(&self) -> Option<ProgressSnapshot> {
        compute_progress(self.core.state.lock().store.state())
    }

    // ----- execution -----

    pub fn set_processor(&self, processor: impl ItemProcessor<P> + 'static) {
        self.set_processor_arc(Arc::new(processor));
    }

    pub fn set_processor_arc(&self, processor: Arc<dyn ItemProcessor<P>>) {
        *self.core.processor.write() = Some(processor);
    }

    pub fn has_processor(&self) -> bool {
        self.core.processor.read().is_some()
    }

    /// Process every item once, in order, and return the final item list
    pub async fn run(&self) -> Result<Vec<BatchItem<P>>> {
        self.core.run().await
    }

    pub fn cancel(&self) {
        self.core.cancel();
    }

    /// Report the queue as paused. Processing is not suspended.
    pub fn pause(&self) -> bool {
        self.core.pause()
    }

    pub fn resume(&self) -> bool {
        self.core.resume()
    }

    /// Retry one failed item; `Ok(None)` when the item is unknown or not failed
    pub async fn retry_one(&self, id: Uuid) -> Result<Option<BatchItem<P>>> {
        self.core.retry_one(id).await
    }

    /// Retry every currently failed item once; returns the retried items
    pub async fn retry_all_failed(&self) -> Result<Vec<BatchItem<P>>> {
        self.core.retry_all_failed().await
    }

    // ----- queries -----

    pub fn is_empty(&self) -> bool {
        self.core.state.lock().store.is_empty()
    }

    pub fn is_processing(&self) -> bool {
        self.core.state.lock().store.state().status.is_active()
    }

    /// True when the queue has items and every one of them is terminal
    pub fn is_complete(&self) -> bool {
        let state = self.core.state.lock();
        let items = &state.store.state().items;
        !items.is_empty() && items.iter().all(BatchItem::is_terminal)
    }

    pub fn has_failures(&self) -> bool {
        self.core.state.lock().store.state().failed_count > 0
    }

    // ----- observers -----

    pub fn add_observer(&self, observer: Arc<dyn QueueObserver<P>>) {
        self.core.dispatcher.add_observer(observer);
    }

    pub fn clear_observers(&self) {
        self.core.dispatcher.clear_observers();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent<P>> {
        self.core.dispatcher.subscribe()
    }

    /// Cancel any active run, reset to the empty idle state and release the
    /// processor and observers. The handle stays usable afterwards.
    pub fn destroy(&self) {
        self.core.destroy();
    }
}

impl<P> fmt::Debug for BatchQueue<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchQueue").field("core", &self.core).finish()
    }
}
