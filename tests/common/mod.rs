//! Shared helpers for queue integration tests
#![allow(dead_code)]

pub mod observers;
pub mod processors;

pub use observers::*;
pub use processors::*;

use docqueue_core::BatchQueue;
use uuid::Uuid;

/// Queue of string payloads with the given display names enqueued
pub fn queue_with(names: &[&str]) -> (BatchQueue<String>, Vec<Uuid>) {
    let queue = BatchQueue::new();
    let ids = queue
        .enqueue(names.iter().map(|name| name.to_string()))
        .into_iter()
        .map(|item| item.id)
        .collect();
    (queue, ids)
}

/// Yield until `condition` holds, giving spawned tasks on the test runtime a chance to run
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
