//! # Queue Core
//!
//! Shared state behind a [`BatchQueue`](super::BatchQueue) handle: the store, the
//! registered processor, the active run (if any) and the dispatcher.
//!
//! Locking discipline: the state mutex is only ever held for synchronous store
//! access. It is released before awaiting the processor and before notifying
//! observers, so processors and observers may call back into the queue.

use super::processor::{ItemProcessor, ProgressReporter};
use crate::config::QueueConfig;
use crate::events::CallbackDispatcher;
use crate::models::WorkPayload;
use crate::queue::{compute_item_progress, compute_progress, QueueStore};
use crate::state_machine::ItemEvent;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::{Arc, Weak};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// The single run allowed per queue instance
#[derive(Debug, Clone)]
pub(crate) struct ActiveRun {
    pub(crate) id: u64,
    pub(crate) token: CancellationToken,
}

#[derive(Debug)]
pub(crate) struct SharedState<P> {
    pub(crate) store: QueueStore<P>,
    pub(crate) active_run: Option<ActiveRun>,
    pub(crate) next_run_id: u64,
}

pub(crate) struct QueueCore<P> {
    pub(crate) state: Mutex<SharedState<P>>,
    pub(crate) processor: RwLock<Option<Arc<dyn ItemProcessor<P>>>>,
    pub(crate) dispatcher: CallbackDispatcher<P>,
    pub(crate) config: QueueConfig,
}

impl<P: WorkPayload> QueueCore<P> {
    pub(crate) fn new(config: QueueConfig) -> Self {
        Self {
            state: Mutex::new(SharedState {
                store: QueueStore::new(),
                active_run: None,
                next_run_id: 1,
            }),
            processor: RwLock::new(None),
            dispatcher: CallbackDispatcher::new(config.event_channel_capacity),
            config,
        }
    }

    pub(crate) fn processor(&self) -> Option<Arc<dyn ItemProcessor<P>>> {
        self.processor.read().clone()
    }

    /// Whether `run_id` still owns the queue. A destroyed run loses ownership
    /// and must not touch or report on whatever run follows it.
    pub(crate) fn is_active_run(&self, run_id: u64) -> bool {
        self.state
            .lock()
            .active_run
            .as_ref()
            .is_some_and(|active| active.id == run_id)
    }

    /// Notify `on_state_change` with a fresh snapshot
    pub(crate) fn emit_state_change(&self) {
        if !self.dispatcher.has_listeners() {
            return;
        }
        let snapshot = self.state.lock().store.snapshot();
        self.dispatcher.state_changed(snapshot);
    }

    /// Notify `on_progress` for the item that is executing. Inside a full run the
    /// aggregate cursor is used; outside one (retries) the view is built around
    /// the item itself.
    pub(crate) fn emit_progress(&self, item_id: Uuid) {
        let snapshot = {
            let state = self.state.lock();
            let queue_state = state.store.state();
            if state.active_run.is_some() {
                compute_progress(queue_state)
            } else {
                compute_item_progress(queue_state, item_id)
            }
        };
        if let Some(progress) = snapshot {
            self.dispatcher.progress(progress);
        }
    }

    /// Overall progress notification at an iteration boundary of a run
    pub(crate) fn emit_run_progress(&self) {
        let snapshot = compute_progress(self.state.lock().store.state());
        if let Some(progress) = snapshot {
            self.dispatcher.progress(progress);
        }
    }

    /// Build the reporter handed to the processor for `item_id`. Holds only a weak
    /// reference so a processor that outlives the queue does not keep it alive.
    pub(crate) fn progress_reporter(self: &Arc<Self>, item_id: Uuid) -> ProgressReporter {
        let core: Weak<Self> = Arc::downgrade(self);
        ProgressReporter::new(
            item_id,
            Arc::new(move |id, percent| {
                if let Some(core) = core.upgrade() {
                    core.record_progress(id, percent);
                }
            }),
        )
    }

    fn record_progress(&self, item_id: Uuid, percent: u8) {
        let applied = self
            .state
            .lock()
            .store
            .apply(item_id, ItemEvent::Progress(percent))
            .is_some();
        if applied {
            self.emit_progress(item_id);
            self.emit_state_change();
        }
    }
}

impl<P> fmt::Debug for QueueCore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueCore")
            .field("has_processor", &self.processor.read().is_some())
            .field("dispatcher", &self.dispatcher)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
