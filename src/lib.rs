#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # DocQueue Core
//!
//! Sequential batch execution core for document processing queues.
//!
//! ## Overview
//!
//! A caller submits a sequence of work items (files) and drives them one at a time
//! through a pluggable asynchronous processor. The core tracks per-item and
//! aggregate progress, isolates per-item failures, supports cooperative
//! cancellation and lets the caller retry failed items.
//!
//! The core does not parse files, decide what counts as sensitive data, persist
//! anything across restarts, or run items in parallel. All of that belongs to the
//! processor or the host application.
//!
//! ## Module Organization
//!
//! - [`queue`] - Item store and progress/statistics views
//! - [`orchestration`] - Run loop, retry controller, processor contract and the
//!   [`BatchQueue`] facade
//! - [`events`] - Observer hooks and the broadcast event bus
//! - [`state_machine`] - Item and queue statuses and item lifecycle events
//! - [`models`] - Items, queue state snapshots and payload types
//! - [`config`] - Queue configuration
//! - [`error`] - Configuration errors and per-item processor failures
//! - [`logging`] - Structured logging bootstrap
//!
//! ## Quick Start
//!
//! ```rust
//! use docqueue_core::orchestration::{processor_fn, ProgressReporter};
//! use docqueue_core::{BatchQueue, FileRef, ProcessorError};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let queue: BatchQueue<FileRef> = BatchQueue::new();
//! queue.set_processor(processor_fn(|file: FileRef, progress: ProgressReporter| async move {
//!     progress.report(100);
//!     Ok::<_, ProcessorError>(json!({ "anonymized": file.name }))
//! }));
//!
//! let created = queue.enqueue(vec![FileRef::new("a.pdf"), FileRef::new("b.docx")]);
//! assert_eq!(created.len(), 2);
//!
//! queue.run().await.unwrap();
//! assert!(queue.is_complete());
//! assert!(!queue.has_failures());
//! # });
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod queue;
pub mod state_machine;

pub use config::QueueConfig;
pub use error::{ProcessorError, QueueError, Result};
pub use events::{PublishedEvent, QueueCallbacks, QueueEvent, QueueObserver};
pub use models::{BatchItem, FileRef, ProgressSnapshot, QueueState, QueueStats, WorkPayload};
pub use orchestration::{BatchQueue, ItemProcessor, ProgressReporter};
pub use state_machine::{ItemEvent, ItemStatus, QueueStatus};
