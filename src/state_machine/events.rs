use super::states::ItemStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events that drive a batch item through its lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ItemEvent {
    /// Hand the item to the processor
    Start,
    /// Processor reported intermediate progress
    Progress(u8),
    /// Processor succeeded with a result
    Complete(Value),
    /// Processor failed with the given reason
    Fail(String),
    /// Return the item to pending, clearing result, error and timestamps
    Reset,
    /// Return the item to pending without touching earlier timestamps (cancellation)
    Requeue,
}

impl ItemEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Progress(_) => "progress",
            Self::Complete(_) => "complete",
            Self::Fail(_) => "fail",
            Self::Reset => "reset",
            Self::Requeue => "requeue",
        }
    }

    /// Status the item ends up in after this event, `None` if status is unchanged
    pub fn target_state(&self) -> Option<ItemStatus> {
        match self {
            Self::Start => Some(ItemStatus::Processing),
            Self::Progress(_) => None,
            Self::Complete(_) => Some(ItemStatus::Completed),
            Self::Fail(_) => Some(ItemStatus::Failed),
            Self::Reset | Self::Requeue => Some(ItemStatus::Pending),
        }
    }

    pub fn fail_with_error(error: impl Into<String>) -> Self {
        Self::Fail(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_states() {
        assert_eq!(ItemEvent::Start.target_state(), Some(ItemStatus::Processing));
        assert_eq!(ItemEvent::Progress(40).target_state(), None);
        assert_eq!(
            ItemEvent::Complete(json!({"pages": 3})).target_state(),
            Some(ItemStatus::Completed)
        );
        assert_eq!(
            ItemEvent::fail_with_error("bad pdf").target_state(),
            Some(ItemStatus::Failed)
        );
        assert_eq!(ItemEvent::Reset.target_state(), Some(ItemStatus::Pending));
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let json = serde_json::to_value(ItemEvent::Progress(10)).unwrap();
        assert_eq!(json, json!({"type": "Progress", "data": 10}));
    }
}
