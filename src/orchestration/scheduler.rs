//! # Scheduler
//!
//! Drives one strictly sequential pass over the queue using the registered
//! processor, and owns the cancel/pause/resume transitions.
//!
//! ## Run semantics
//!
//! - Items are processed in store order. The live item list is re-read at every
//!   iteration boundary, so items enqueued during a run are picked up when the
//!   cursor reaches them. Removing items behind the cursor is tracked; mutating
//!   the queue ahead of the cursor during a run is the caller's responsibility.
//! - Cancellation is cooperative: the run token is checked only before an item
//!   starts. An item already handed to the processor always runs to completion.
//! - A processor failure (error or panic) is recorded on that item only and the
//!   run moves on to the next item.
//! - Pause is advisory. It changes the reported status but the loop keeps going.

use super::core::{ActiveRun, QueueCore};
use super::processor::ItemProcessor;
use crate::error::{ProcessorError, QueueError, Result};
use crate::logging::log_item_operation;
use crate::models::{BatchItem, WorkPayload};
use crate::state_machine::ItemEvent;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Terminal result of executing one item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome<P> {
    Completed(BatchItem<P>),
    Failed(BatchItem<P>),
}

impl<P> ItemOutcome<P> {
    pub fn into_item(self) -> BatchItem<P> {
        match self {
            Self::Completed(item) | Self::Failed(item) => item,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

impl<P: WorkPayload> QueueCore<P> {
    /// Run every queued item once, in order.
    ///
    /// Returns the final item list, or an empty list when the queue is empty or
    /// the run was destroyed before it finished.
    #[instrument(skip(self))]
    pub(crate) async fn run(self: &Arc<Self>) -> Result<Vec<BatchItem<P>>> {
        let processor = self.processor().ok_or(QueueError::NoProcessor)?;

        let (run_id, token, total) = {
            let mut state = self.state.lock();
            if state.store.is_empty() {
                debug!("Run requested on an empty queue");
                return Ok(Vec::new());
            }
            if state.store.is_running() || state.active_run.is_some() {
                warn!("Run requested while another run is active");
                return Err(QueueError::AlreadyRunning);
            }

            let run_id = state.next_run_id;
            state.next_run_id += 1;
            let token = CancellationToken::new();
            state.active_run = Some(ActiveRun {
                id: run_id,
                token: token.clone(),
            });
            state.store.begin_run();
            (run_id, token, state.store.len())
        };
        self.emit_state_change();

        info!(run_id = run_id, items = total, "Starting batch run");

        let mut index = 0;
        loop {
            if token.is_cancelled() {
                debug!(run_id = run_id, index = index, "Run cancelled before next item");
                break;
            }

            let item_id = {
                let mut state = self.state.lock();
                let owned = state
                    .active_run
                    .as_ref()
                    .is_some_and(|active| active.id == run_id);
                if !owned {
                    break;
                }
                match state.store.id_at(index) {
                    Some(id) => {
                        state.store.set_current_index(Some(index));
                        id
                    }
                    None => break,
                }
            };

            self.execute_item(&processor, item_id).await;

            if !self.is_active_run(run_id) {
                debug!(run_id = run_id, "Run was destroyed while an item was in flight");
                break;
            }
            self.emit_run_progress();

            // removals behind the cursor shift it, so continue from wherever it now points
            index = self
                .state
                .lock()
                .store
                .state()
                .current_index
                .map_or(index + 1, |current| current + 1);
        }

        let cancelled = token.is_cancelled();
        let final_items = {
            let mut state = self.state.lock();
            let still_active = state
                .active_run
                .as_ref()
                .is_some_and(|active| active.id == run_id);
            if still_active {
                state.active_run = None;
                state.store.finish_run(cancelled);
                Some(state.store.list())
            } else {
                None
            }
        };

        // a destroyed run owns nothing it could report on
        let Some(final_items) = final_items else {
            info!(run_id = run_id, "Batch run abandoned after destroy");
            return Ok(Vec::new());
        };
        self.emit_state_change();

        let stats = {
            let state = self.state.lock();
            (state.store.state().completed_count, state.store.state().failed_count)
        };
        info!(
            run_id = run_id,
            cancelled = cancelled,
            completed = stats.0,
            failed = stats.1,
            "Batch run finished"
        );

        self.dispatcher.batch_completed(final_items.clone());
        Ok(final_items)
    }

    /// Execute one item with the given processor.
    ///
    /// Shared by the run loop and the retry controller. Returns `None` when the
    /// item no longer exists or cannot be started.
    pub(crate) async fn execute_item(
        self: &Arc<Self>,
        processor: &Arc<dyn ItemProcessor<P>>,
        item_id: Uuid,
    ) -> Option<ItemOutcome<P>> {
        let started = self.state.lock().store.apply(item_id, ItemEvent::Start);
        let Some(started) = started else {
            warn!(item_id = %item_id, "Item could not be started");
            return None;
        };
        self.emit_state_change();
        debug!(item_id = %item_id, display_name = %started.display_name, "Processing item");

        let reporter = self.progress_reporter(item_id);
        let outcome = AssertUnwindSafe(processor.process(started.payload.clone(), reporter))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(ProcessorError::from_panic(panic)));

        let (event, failure) = match outcome {
            Ok(result) => (ItemEvent::Complete(result), None),
            Err(err) => {
                let reason = err.reason().to_string();
                (ItemEvent::Fail(reason.clone()), Some(reason))
            }
        };

        let finished = self.state.lock().store.apply(item_id, event);
        let Some(finished) = finished else {
            warn!(item_id = %item_id, "Item disappeared while processing; outcome dropped");
            return None;
        };

        let outcome = match failure {
            None => {
                log_item_operation(
                    "process",
                    Some(&item_id.to_string()),
                    Some(&finished.display_name),
                    "completed",
                    None,
                );
                self.dispatcher.item_completed(finished.clone());
                ItemOutcome::Completed(finished)
            }
            Some(reason) => {
                log_item_operation(
                    "process",
                    Some(&item_id.to_string()),
                    Some(&finished.display_name),
                    "failed",
                    Some(&reason),
                );
                self.dispatcher.item_failed(finished.clone(), reason);
                ItemOutcome::Failed(finished)
            }
        };

        self.emit_progress(item_id);
        self.emit_state_change();
        Some(outcome)
    }

    /// Signal the active run and mark the queue cancelled.
    ///
    /// The in-flight item is not interrupted; it finishes and keeps its outcome.
    pub(crate) fn cancel(&self) {
        {
            let mut state = self.state.lock();
            if let Some(active) = &state.active_run {
                active.token.cancel();
                info!(run_id = active.id, "Cancelling batch run");
            }
            state.store.cancel_items();
        }
        self.emit_state_change();
    }

    pub(crate) fn pause(&self) -> bool {
        let paused = self.state.lock().store.pause();
        if paused {
            info!("Queue paused (status only; processing continues)");
            self.emit_state_change();
        }
        paused
    }

    pub(crate) fn resume(&self) -> bool {
        let resumed = self.state.lock().store.resume();
        if resumed {
            info!("Queue resumed");
            self.emit_state_change();
        }
        resumed
    }

    /// Cancel any active run, reset to empty/idle and drop the processor and observers
    pub(crate) fn destroy(&self) {
        {
            let mut state = self.state.lock();
            if let Some(active) = state.active_run.take() {
                active.token.cancel();
            }
            state.store.reset();
        }
        *self.processor.write() = None;
        self.emit_state_change();
        self.dispatcher.clear_observers();
        debug!("Queue destroyed");
    }
}
