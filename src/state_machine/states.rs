use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-item status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Waiting to be processed
    #[default]
    Pending,
    /// Currently handed to the processor
    Processing,
    /// Processor returned a result
    Completed,
    /// Processor returned an error
    Failed,
}

impl ItemStatus {
    /// Completed and failed items are not revisited without an explicit retry
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Processing)
    }

    /// Check whether the item may move from this status to `target`.
    ///
    /// `Processing -> Pending` covers cancellation; `Completed/Failed -> Pending`
    /// covers the reset at the start of a fresh run and the retry reset.
    pub fn can_transition_to(&self, target: ItemStatus) -> bool {
        use ItemStatus::*;
        matches!(
            (self, target),
            (Pending, Processing)
                | (Pending, Pending)
                | (Processing, Completed)
                | (Processing, Failed)
                | (Processing, Pending)
                | (Completed, Pending)
                | (Failed, Pending)
                // a cancel during processing resets to pending before the
                // in-flight processor call returns
                | (Pending, Completed)
                | (Pending, Failed)
        )
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid item status: {s}")),
        }
    }
}

/// Aggregate queue status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    #[default]
    Idle,
    Processing,
    /// Reported status only; the run loop keeps going while paused
    Paused,
    Completed,
    Cancelled,
}

impl QueueStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Processing)
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Processing => write!(f, "processing"),
            Self::Paused => write!(f, "paused"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for QueueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "processing" => Ok(Self::Processing),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid queue status: {s}")),
        }
    }
}
