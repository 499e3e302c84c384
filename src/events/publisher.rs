use crate::constants::events;
use crate::models::{BatchItem, ProgressSnapshot, QueueState};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Queue notifications as data, mirrored from the observer hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum QueueEvent<P> {
    StateChanged(QueueState<P>),
    Progress(ProgressSnapshot),
    ItemCompleted(BatchItem<P>),
    ItemFailed { item: BatchItem<P>, error: String },
    BatchCompleted(Vec<BatchItem<P>>),
}

impl<P> QueueEvent<P> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StateChanged(_) => events::QUEUE_STATE_CHANGED,
            Self::Progress(_) => events::QUEUE_PROGRESS,
            Self::ItemCompleted(_) => events::ITEM_COMPLETED,
            Self::ItemFailed { .. } => events::ITEM_FAILED,
            Self::BatchCompleted(_) => events::BATCH_COMPLETED,
        }
    }
}

/// Event that has been published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedEvent<P> {
    pub name: String,
    pub event: QueueEvent<P>,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

/// Broadcast bus for queue events
#[derive(Debug, Clone)]
pub struct EventPublisher<P> {
    sender: broadcast::Sender<PublishedEvent<P>>,
}

impl<P: Clone> EventPublisher<P> {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: QueueEvent<P>) {
        let published = PublishedEvent {
            name: event.name().to_string(),
            event,
            published_at: chrono::Utc::now(),
        };
        // send only fails when nobody is listening
        let _ = self.sender.send(published);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent<P>> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<P: Clone> Default for EventPublisher<P> {
    fn default() -> Self {
        Self::new(crate::constants::defaults::EVENT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let publisher = EventPublisher::<String>::new(4);
        publisher.publish(QueueEvent::BatchCompleted(Vec::new()));
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let publisher = EventPublisher::<String>::new(4);
        let mut receiver = publisher.subscribe();

        publisher.publish(QueueEvent::BatchCompleted(Vec::new()));

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.name, "batch.completed");
        assert_eq!(received.event, QueueEvent::BatchCompleted(Vec::new()));
    }

    #[test]
    fn test_event_serialization() {
        let event: QueueEvent<String> = QueueEvent::Progress(ProgressSnapshot {
            current_index: 0,
            total_files: 2,
            current_file_name: "a.pdf".to_string(),
            overall_progress: 0,
            current_file_progress: 25,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["data"]["current_file_progress"], 25);
    }
}
