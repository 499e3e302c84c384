//! # Item Processor
//!
//! The processor is the single integration point with the transformation logic
//! (detection, anonymization, conversion). The queue hands it one payload at a
//! time together with a [`ProgressReporter`] and records whatever it returns.
//!
//! ```rust
//! use docqueue_core::orchestration::{processor_fn, ProgressReporter};
//! use docqueue_core::ProcessorError;
//! use serde_json::json;
//!
//! let _processor = processor_fn(|name: String, progress: ProgressReporter| async move {
//!     progress.report(50);
//!     if name.ends_with(".exe") {
//!         return Err(ProcessorError::new("unsupported file type"));
//!     }
//!     Ok(json!({ "file": name, "entities": 0 }))
//! });
//! ```

use crate::error::ProcessorError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

/// Transforms one payload into an opaque result or a failure
#[async_trait]
pub trait ItemProcessor<P>: Send + Sync {
    async fn process(&self, payload: P, progress: ProgressReporter) -> Result<Value, ProcessorError>;
}

/// Adapter turning an async closure into an [`ItemProcessor`]
pub struct FnProcessor<F> {
    f: F,
}

pub fn processor_fn<F>(f: F) -> FnProcessor<F> {
    FnProcessor { f }
}

#[async_trait]
impl<P, F, Fut> ItemProcessor<P> for FnProcessor<F>
where
    P: Send + 'static,
    F: Fn(P, ProgressReporter) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ProcessorError>> + Send + 'static,
{
    async fn process(&self, payload: P, progress: ProgressReporter) -> Result<Value, ProcessorError> {
        (self.f)(payload, progress).await
    }
}

impl<F> fmt::Debug for FnProcessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProcessor").finish_non_exhaustive()
    }
}

type ProgressSink = Arc<dyn Fn(Uuid, u8) + Send + Sync>;

/// Handle given to a processor for reporting the current item's progress (0..=100).
///
/// Reports are clamped to 100 and ignored once the item is no longer processing.
#[derive(Clone)]
pub struct ProgressReporter {
    item_id: Uuid,
    sink: Option<ProgressSink>,
}

impl ProgressReporter {
    pub(crate) fn new(item_id: Uuid, sink: ProgressSink) -> Self {
        Self {
            item_id,
            sink: Some(sink),
        }
    }

    /// Reporter that discards every update
    pub fn noop() -> Self {
        Self {
            item_id: Uuid::nil(),
            sink: None,
        }
    }

    pub fn item_id(&self) -> Uuid {
        self.item_id
    }

    pub fn report(&self, percent: u8) {
        if let Some(sink) = &self.sink {
            sink(self.item_id, percent);
        }
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("item_id", &self.item_id)
            .field("connected", &self.sink.is_some())
            .finish()
    }
}
