use docqueue_core::orchestration::{processor_fn, ItemProcessor, ProgressReporter};
use docqueue_core::ProcessorError;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

/// Succeeds for every payload, reporting 50% halfway
pub fn succeeding_processor() -> Arc<dyn ItemProcessor<String>> {
    Arc::new(processor_fn(
        |name: String, progress: ProgressReporter| async move {
            progress.report(50);
            Ok::<_, ProcessorError>(json!({ "file": name }))
        },
    ))
}

/// Fails only for payloads in `targets`
pub fn failing_for(targets: &[&str]) -> Arc<dyn ItemProcessor<String>> {
    let targets: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
    Arc::new(processor_fn(
        move |name: String, _progress: ProgressReporter| {
            let fail = targets.contains(&name);
            async move {
                if fail {
                    Err(ProcessorError::new(format!("cannot process {name}")))
                } else {
                    Ok(json!({ "file": name }))
                }
            }
        },
    ))
}

/// Fails the first `failures` attempts for each payload in `targets`, then succeeds
pub fn flaky_processor(targets: &[&str], failures: usize) -> Arc<dyn ItemProcessor<String>> {
    let targets: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
    let attempts: Arc<Mutex<HashMap<String, usize>>> = Arc::new(Mutex::new(HashMap::new()));
    Arc::new(processor_fn(
        move |name: String, _progress: ProgressReporter| {
            let fail = if targets.contains(&name) {
                let mut attempts = attempts.lock();
                let count = attempts.entry(name.clone()).or_insert(0);
                *count += 1;
                *count <= failures
            } else {
                false
            };
            async move {
                if fail {
                    Err(ProcessorError::new("transient failure"))
                } else {
                    Ok(json!({ "file": name }))
                }
            }
        },
    ))
}

/// Blocks every item until the gate is notified once per item
pub fn gated_processor(gate: Arc<Notify>) -> Arc<dyn ItemProcessor<String>> {
    Arc::new(processor_fn(
        move |name: String, progress: ProgressReporter| {
            let gate = gate.clone();
            async move {
                progress.report(10);
                gate.notified().await;
                Ok::<Value, ProcessorError>(json!({ "file": name }))
            }
        },
    ))
}

/// Records the order in which payloads reach the processor
pub fn recording_processor(seen: Arc<Mutex<Vec<String>>>) -> Arc<dyn ItemProcessor<String>> {
    Arc::new(processor_fn(
        move |name: String, _progress: ProgressReporter| {
            seen.lock().push(name.clone());
            async move { Ok::<_, ProcessorError>(json!({ "file": name })) }
        },
    ))
}
