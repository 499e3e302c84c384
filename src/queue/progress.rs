//! # Progress Aggregator
//!
//! Stateless read views derived from a [`QueueState`].

use crate::models::{ProgressSnapshot, QueueState, QueueStats};
use crate::state_machine::ItemStatus;
use uuid::Uuid;

/// Overall progress of the active run, `None` when no run is mid-flight or the
/// current index no longer resolves to an item.
pub fn compute_progress<P>(state: &QueueState<P>) -> Option<ProgressSnapshot> {
    let index = state.current_index?;
    snapshot_at(state, index)
}

/// Progress view centred on one item, used while that item executes outside a
/// full run (retries).
pub fn compute_item_progress<P>(state: &QueueState<P>, id: Uuid) -> Option<ProgressSnapshot> {
    let index = state.position(id)?;
    snapshot_at(state, index)
}

fn snapshot_at<P>(state: &QueueState<P>, index: usize) -> Option<ProgressSnapshot> {
    let item = state.items.get(index)?;
    let total_files = state.items.len();
    Some(ProgressSnapshot {
        current_index: index,
        total_files,
        current_file_name: item.display_name.clone(),
        overall_progress: overall_percent(state.completed_count + state.failed_count, total_files),
        current_file_progress: item.progress,
    })
}

/// `round(100 * done / total)`, 0 for an empty queue
pub fn overall_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (done as f64 * 100.0 / total as f64).round();
    percent.clamp(0.0, 100.0) as u8
}

pub fn compute_stats<P>(state: &QueueState<P>) -> QueueStats {
    let mut stats = QueueStats {
        total: state.items.len(),
        pending: 0,
        processing: 0,
        completed: 0,
        failed: 0,
        success_rate: 0.0,
    };

    for item in &state.items {
        match item.status {
            ItemStatus::Pending => stats.pending += 1,
            ItemStatus::Processing => stats.processing += 1,
            ItemStatus::Completed => stats.completed += 1,
            ItemStatus::Failed => stats.failed += 1,
        }
    }

    let terminal = stats.completed + stats.failed;
    if terminal > 0 {
        stats.success_rate = stats.completed as f64 * 100.0 / terminal as f64;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BatchItem;
    use crate::state_machine::ItemEvent;
    use serde_json::Value;

    fn state_with(names: &[&str]) -> QueueState<String> {
        let mut state = QueueState::default();
        for name in names {
            state.items.push(BatchItem::new(name.to_string()));
        }
        state
    }

    #[test]
    fn test_no_progress_without_current_index() {
        let state = state_with(&["a.pdf"]);
        assert!(compute_progress(&state).is_none());
    }

    #[test]
    fn test_progress_for_unresolvable_index() {
        let mut state = state_with(&["a.pdf"]);
        state.current_index = Some(5);
        assert!(compute_progress(&state).is_none());
    }

    #[test]
    fn test_progress_snapshot() {
        let mut state = state_with(&["a.pdf", "b.pdf", "c.pdf"]);
        state.items[0].apply(ItemEvent::Start);
        state.items[0].apply(ItemEvent::Complete(Value::Null));
        state.items[1].apply(ItemEvent::Start);
        state.items[1].apply(ItemEvent::Progress(30));
        state.recompute_totals();
        state.current_index = Some(1);

        let progress = compute_progress(&state).unwrap();
        assert_eq!(progress.current_index, 1);
        assert_eq!(progress.total_files, 3);
        assert_eq!(progress.current_file_name, "b.pdf");
        assert_eq!(progress.overall_progress, 33);
        assert_eq!(progress.current_file_progress, 30);
    }

    #[test]
    fn test_overall_percent_rounding() {
        assert_eq!(overall_percent(0, 0), 0);
        assert_eq!(overall_percent(2, 3), 67);
        assert_eq!(overall_percent(1, 8), 13);
        assert_eq!(overall_percent(4, 4), 100);
    }

    #[test]
    fn test_stats_scan_statuses() {
        let mut state = state_with(&["a", "b", "c", "d"]);
        state.items[0].apply(ItemEvent::Start);
        state.items[0].apply(ItemEvent::Complete(Value::Null));
        state.items[1].apply(ItemEvent::Start);
        state.items[1].apply(ItemEvent::Fail("x".into()));
        state.items[2].apply(ItemEvent::Start);

        let stats = compute_stats(&state);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.processing, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 1);
        assert!((stats.success_rate - 50.0).abs() < f64::EPSILON);
    }
}
