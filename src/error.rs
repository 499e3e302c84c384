//! # Error Types
//!
//! Two classes of failure exist in the queue core:
//!
//! - [`QueueError`]: configuration errors (no processor registered, a run already
//!   active, invalid settings). These are rejected before any state mutation and
//!   indicate a programming error in the caller.
//! - [`ProcessorError`]: a single item's processing failure. These never escape the
//!   run loop; they are recorded on the item's `error` field instead.

use std::any::Any;

/// Configuration-class errors returned by queue operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Configuration error: no processor registered")]
    NoProcessor,
    #[error("Configuration error: queue is already processing")]
    AlreadyRunning,
    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, QueueError>;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Failure reported by a processor for one item
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ProcessorError {
    reason: String,
}

impl ProcessorError {
    /// Create a failure with the given reason. Blank reasons become "Unknown error"
    /// so a failed item always carries a non-empty description.
    pub fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.trim().is_empty() {
            Self {
                reason: UNKNOWN_ERROR.to_string(),
            }
        } else {
            Self { reason }
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Coerce a panic payload into a failure description
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            UNKNOWN_ERROR.to_string()
        };
        Self::new(format!("processor panicked: {message}"))
    }
}

impl From<String> for ProcessorError {
    fn from(reason: String) -> Self {
        Self::new(reason)
    }
}

impl From<&str> for ProcessorError {
    fn from(reason: &str) -> Self {
        Self::new(reason)
    }
}

impl From<anyhow::Error> for ProcessorError {
    fn from(err: anyhow::Error) -> Self {
        // alternate formatting keeps the context chain
        Self::new(format!("{err:#}"))
    }
}

impl From<std::io::Error> for ProcessorError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for ProcessorError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_queue_error_messages() {
        assert_eq!(
            QueueError::NoProcessor.to_string(),
            "Configuration error: no processor registered"
        );
        assert_eq!(
            QueueError::AlreadyRunning.to_string(),
            "Configuration error: queue is already processing"
        );
        assert_eq!(
            QueueError::Configuration("bad value".to_string()).to_string(),
            "Configuration error: bad value"
        );
    }

    #[test]
    fn test_blank_reason_is_replaced() {
        assert_eq!(ProcessorError::new("").reason(), "Unknown error");
        assert_eq!(ProcessorError::new("   ").reason(), "Unknown error");
        assert_eq!(ProcessorError::new("boom").reason(), "boom");
    }

    #[test]
    fn test_anyhow_context_is_preserved() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("disk full")).context("writing output");
        let converted = ProcessorError::from(err.unwrap_err());
        assert_eq!(converted.reason(), "writing output: disk full");
    }

    #[test]
    fn test_panic_payload_coercion() {
        let static_payload: Box<dyn Any + Send> = Box::new("bad input");
        assert_eq!(
            ProcessorError::from_panic(static_payload).reason(),
            "processor panicked: bad input"
        );

        let owned_payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(
            ProcessorError::from_panic(owned_payload).reason(),
            "processor panicked: owned"
        );

        let opaque_payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(
            ProcessorError::from_panic(opaque_payload).reason(),
            "processor panicked: Unknown error"
        );
    }
}
