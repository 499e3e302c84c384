//! # Queue Configuration
//!
//! Settings for a [`BatchQueue`](crate::orchestration::BatchQueue) instance, loaded
//! from defaults, an optional file and `DOCQUEUE_*` environment variables.
//!
//! `concurrency_limit` is accepted and validated but the run loop does not consult
//! it: items are always processed one at a time.

use crate::constants::{defaults, env};
use crate::error::{QueueError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Reserved extension point, currently inert
    pub concurrency_limit: usize,
    /// Buffer size of the broadcast event bus
    pub event_channel_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: defaults::CONCURRENCY_LIMIT,
            event_channel_capacity: defaults::EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl QueueConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(limit) = std::env::var(env::CONCURRENCY_LIMIT) {
            config.concurrency_limit = limit.parse().map_err(|e| {
                QueueError::Configuration(format!("Invalid concurrency_limit: {e}"))
            })?;
        }

        if let Ok(capacity) = std::env::var(env::EVENT_CHANNEL_CAPACITY) {
            config.event_channel_capacity = capacity.parse().map_err(|e| {
                QueueError::Configuration(format!("Invalid event_channel_capacity: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Layer defaults, an optional config file (format chosen by extension) and
    /// `DOCQUEUE_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(config::Environment::with_prefix(env::PREFIX).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| QueueError::Configuration(format!("Failed to load config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency_limit == 0 {
            return Err(QueueError::Configuration(
                "concurrency_limit must be at least 1".to_string(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(QueueError::Configuration(
                "event_channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
