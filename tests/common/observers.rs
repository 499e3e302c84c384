use docqueue_core::{BatchItem, ProgressSnapshot, QueueObserver, QueueState, QueueStatus};
use parking_lot::Mutex;

/// Observer that records every notification it receives
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
    pub statuses: Mutex<Vec<QueueStatus>>,
    pub progress: Mutex<Vec<ProgressSnapshot>>,
    pub completed: Mutex<Vec<String>>,
    pub failed: Mutex<Vec<(String, String)>>,
    pub batches: Mutex<Vec<Vec<BatchItem<String>>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.lock().iter().filter(|e| e.as_str() == event).count()
    }
}

impl QueueObserver<String> for RecordingObserver {
    fn on_state_change(&self, state: &QueueState<String>) {
        self.events.lock().push("state_change".to_string());
        self.statuses.lock().push(state.status);
    }

    fn on_progress(&self, progress: &ProgressSnapshot) {
        self.events.lock().push("progress".to_string());
        self.progress.lock().push(progress.clone());
    }

    fn on_item_complete(&self, item: &BatchItem<String>) {
        self.events.lock().push("item_complete".to_string());
        self.completed.lock().push(item.display_name.clone());
    }

    fn on_item_error(&self, item: &BatchItem<String>, error: &str) {
        self.events.lock().push("item_error".to_string());
        self.failed
            .lock()
            .push((item.display_name.clone(), error.to_string()));
    }

    fn on_batch_complete(&self, items: &[BatchItem<String>]) {
        self.events.lock().push("batch_complete".to_string());
        self.batches.lock().push(items.to_vec());
    }
}
