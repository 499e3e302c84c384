//! # Orchestration
//!
//! Execution side of the queue.
//!
//! - **BatchQueue**: caller-owned facade over one queue instance
//! - **Scheduler**: sequential run loop, single-item execution, cancel/pause/resume
//! - **Retry controller**: re-executes failed items outside a full run
//! - **ItemProcessor**: the pluggable transformation step, with a closure adapter
//!   and the progress reporter handed to it

pub mod batch_queue;
pub(crate) mod core;
pub mod processor;
pub mod retry;
pub mod scheduler;

pub use batch_queue::BatchQueue;
pub use processor::{processor_fn, FnProcessor, ItemProcessor, ProgressReporter};
pub use scheduler::ItemOutcome;
