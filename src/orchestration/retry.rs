//! # Retry Controller
//!
//! Re-executes failed items outside a full run. Retries reuse the scheduler's
//! single-item routine, never change the aggregate status and never fire
//! `on_batch_complete`. They are not guarded against an active run; callers
//! serialize them.

use super::core::QueueCore;
use super::scheduler::ItemOutcome;
use crate::error::{QueueError, Result};
use crate::models::{BatchItem, WorkPayload};
use crate::state_machine::{ItemEvent, ItemStatus};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

impl<P: WorkPayload> QueueCore<P> {
    /// Retry one failed item. `Ok(None)` when the item is unknown or not failed.
    #[instrument(skip(self), fields(item_id = %id))]
    pub(crate) async fn retry_one(self: &Arc<Self>, id: Uuid) -> Result<Option<BatchItem<P>>> {
        let processor = self.processor().ok_or(QueueError::NoProcessor)?;

        let reset = {
            let mut state = self.state.lock();
            let is_failed = state
                .store
                .state()
                .item(id)
                .is_some_and(|item| item.status == ItemStatus::Failed);
            is_failed && state.store.apply(id, ItemEvent::Reset).is_some()
        };
        if !reset {
            debug!("Retry not applicable");
            return Ok(None);
        }
        self.emit_state_change();

        let outcome = self.execute_item(&processor, id).await;

        self.state.lock().store.recompute_totals();
        self.emit_state_change();

        info!(
            succeeded = outcome.as_ref().is_some_and(ItemOutcome::is_success),
            "Retry finished"
        );
        Ok(outcome.map(ItemOutcome::into_item))
    }

    /// Retry every item that is failed right now, one at a time.
    ///
    /// Items that fail again during this pass are not retried a second time.
    #[instrument(skip(self))]
    pub(crate) async fn retry_all_failed(self: &Arc<Self>) -> Result<Vec<BatchItem<P>>> {
        let processor = self.processor().ok_or(QueueError::NoProcessor)?;

        let failed_ids: Vec<Uuid> = {
            let mut state = self.state.lock();
            let ids: Vec<Uuid> = state
                .store
                .list_by_status(ItemStatus::Failed)
                .into_iter()
                .map(|item| item.id)
                .collect();
            for id in &ids {
                state.store.apply(*id, ItemEvent::Reset);
            }
            ids
        };
        if failed_ids.is_empty() {
            debug!("No failed items to retry");
            return Ok(Vec::new());
        }
        self.emit_state_change();

        info!(items = failed_ids.len(), "Retrying failed items");

        let mut retried = Vec::with_capacity(failed_ids.len());
        for id in failed_ids {
            if let Some(outcome) = self.execute_item(&processor, id).await {
                retried.push(outcome.into_item());
            }
        }

        self.state.lock().store.recompute_totals();
        self.emit_state_change();

        let succeeded = retried
            .iter()
            .filter(|item| item.status == ItemStatus::Completed)
            .count();
        info!(
            attempted = retried.len(),
            succeeded = succeeded,
            "Retry pass finished"
        );
        Ok(retried)
    }
}
