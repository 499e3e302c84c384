use crate::constants::PROGRESS_MAX;
use crate::models::payload::WorkPayload;
use crate::state_machine::{ItemEvent, ItemStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

/// BatchItem is one unit of work in the queue
///
/// `result` is present only while `status == Completed` and `error` only while
/// `status == Failed`; both are maintained by [`BatchItem::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem<P> {
    pub id: Uuid,
    pub payload: P,
    pub display_name: String,
    pub status: ItemStatus,
    pub progress: u8,
    pub added_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl<P: WorkPayload> BatchItem<P> {
    /// Create a pending item with a fresh id
    pub fn new(payload: P) -> Self {
        let display_name = payload.display_name();
        Self {
            id: Uuid::new_v4(),
            payload,
            display_name,
            status: ItemStatus::Pending,
            progress: 0,
            added_at: Utc::now(),
            started_at: None,
            completed_at: None,
            result: None,
            error: None,
        }
    }
}

impl<P> BatchItem<P> {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Time spent in the processor, if the item has started and finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.completed_at) {
            (Some(started), Some(completed)) => Some(completed - started),
            _ => None,
        }
    }

    /// Apply a lifecycle event. Returns `false` without mutating anything when the
    /// event is not valid for the current status.
    pub fn apply(&mut self, event: ItemEvent) -> bool {
        if let Some(target) = event.target_state() {
            if !self.status.can_transition_to(target) {
                warn!(
                    item_id = %self.id,
                    from = %self.status,
                    to = %target,
                    event = event.event_type(),
                    "Rejected invalid item transition"
                );
                return false;
            }
        }

        match event {
            ItemEvent::Start => {
                self.status = ItemStatus::Processing;
                self.progress = 0;
                self.started_at = Some(Utc::now());
                self.completed_at = None;
                self.result = None;
                self.error = None;
            }
            ItemEvent::Progress(percent) => {
                if self.status != ItemStatus::Processing {
                    return false;
                }
                self.progress = percent.min(PROGRESS_MAX);
            }
            ItemEvent::Complete(result) => {
                self.status = ItemStatus::Completed;
                self.progress = PROGRESS_MAX;
                self.completed_at = Some(Utc::now());
                self.result = Some(result);
                self.error = None;
            }
            ItemEvent::Fail(reason) => {
                self.status = ItemStatus::Failed;
                self.progress = 0;
                self.completed_at = Some(Utc::now());
                self.result = None;
                self.error = Some(reason);
            }
            ItemEvent::Reset => {
                self.status = ItemStatus::Pending;
                self.progress = 0;
                self.started_at = None;
                self.completed_at = None;
                self.result = None;
                self.error = None;
            }
            ItemEvent::Requeue => {
                self.status = ItemStatus::Pending;
                self.progress = 0;
            }
        }
        true
    }
}
