//! # Callback Dispatcher
//!
//! Fans every queue notification out to registered [`QueueObserver`]s and mirrors
//! it onto the [`EventPublisher`] broadcast bus. All arguments are owned snapshots;
//! observers never see live queue state and may call back into the queue.

use super::publisher::{EventPublisher, PublishedEvent, QueueEvent};
use crate::models::{BatchItem, ProgressSnapshot, QueueState};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Observer hooks. Every hook is optional.
pub trait QueueObserver<P>: Send + Sync {
    /// After every mutation of the queue
    fn on_state_change(&self, _state: &QueueState<P>) {}

    /// After each progress update and each terminal transition of an executing item
    fn on_progress(&self, _progress: &ProgressSnapshot) {}

    fn on_item_complete(&self, _item: &BatchItem<P>) {}

    fn on_item_error(&self, _item: &BatchItem<P>, _error: &str) {}

    /// Once per full run, never for retries
    fn on_batch_complete(&self, _items: &[BatchItem<P>]) {}
}

type StateHook<P> = Box<dyn Fn(&QueueState<P>) + Send + Sync>;
type ProgressHook = Box<dyn Fn(&ProgressSnapshot) + Send + Sync>;
type ItemHook<P> = Box<dyn Fn(&BatchItem<P>) + Send + Sync>;
type ItemErrorHook<P> = Box<dyn Fn(&BatchItem<P>, &str) + Send + Sync>;
type BatchHook<P> = Box<dyn Fn(&[BatchItem<P>]) + Send + Sync>;

/// Closure-based observer for callers that only need a few hooks
pub struct QueueCallbacks<P> {
    on_state_change: Option<StateHook<P>>,
    on_progress: Option<ProgressHook>,
    on_item_complete: Option<ItemHook<P>>,
    on_item_error: Option<ItemErrorHook<P>>,
    on_batch_complete: Option<BatchHook<P>>,
}

impl<P> Default for QueueCallbacks<P> {
    fn default() -> Self {
        Self {
            on_state_change: None,
            on_progress: None,
            on_item_complete: None,
            on_item_error: None,
            on_batch_complete: None,
        }
    }
}

impl<P> QueueCallbacks<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_state_change(mut self, hook: impl Fn(&QueueState<P>) + Send + Sync + 'static) -> Self {
        self.on_state_change = Some(Box::new(hook));
        self
    }

    pub fn on_progress(mut self, hook: impl Fn(&ProgressSnapshot) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(hook));
        self
    }

    pub fn on_item_complete(mut self, hook: impl Fn(&BatchItem<P>) + Send + Sync + 'static) -> Self {
        self.on_item_complete = Some(Box::new(hook));
        self
    }

    pub fn on_item_error(
        mut self,
        hook: impl Fn(&BatchItem<P>, &str) + Send + Sync + 'static,
    ) -> Self {
        self.on_item_error = Some(Box::new(hook));
        self
    }

    pub fn on_batch_complete(
        mut self,
        hook: impl Fn(&[BatchItem<P>]) + Send + Sync + 'static,
    ) -> Self {
        self.on_batch_complete = Some(Box::new(hook));
        self
    }
}

impl<P> fmt::Debug for QueueCallbacks<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueCallbacks")
            .field("on_state_change", &self.on_state_change.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .field("on_item_complete", &self.on_item_complete.is_some())
            .field("on_item_error", &self.on_item_error.is_some())
            .field("on_batch_complete", &self.on_batch_complete.is_some())
            .finish()
    }
}

impl<P: Send + Sync> QueueObserver<P> for QueueCallbacks<P> {
    fn on_state_change(&self, state: &QueueState<P>) {
        if let Some(hook) = &self.on_state_change {
            hook(state);
        }
    }

    fn on_progress(&self, progress: &ProgressSnapshot) {
        if let Some(hook) = &self.on_progress {
            hook(progress);
        }
    }

    fn on_item_complete(&self, item: &BatchItem<P>) {
        if let Some(hook) = &self.on_item_complete {
            hook(item);
        }
    }

    fn on_item_error(&self, item: &BatchItem<P>, error: &str) {
        if let Some(hook) = &self.on_item_error {
            hook(item, error);
        }
    }

    fn on_batch_complete(&self, items: &[BatchItem<P>]) {
        if let Some(hook) = &self.on_batch_complete {
            hook(items);
        }
    }
}

pub struct CallbackDispatcher<P> {
    observers: RwLock<Vec<Arc<dyn QueueObserver<P>>>>,
    publisher: EventPublisher<P>,
}

impl<P: Clone + Send + Sync + 'static> CallbackDispatcher<P> {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
            publisher: EventPublisher::new(channel_capacity),
        }
    }

    pub fn add_observer(&self, observer: Arc<dyn QueueObserver<P>>) {
        self.observers.write().push(observer);
    }

    pub fn clear_observers(&self) {
        self.observers.write().clear();
    }

    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent<P>> {
        self.publisher.subscribe()
    }

    /// Whether anyone would receive a notification. Lets callers skip building
    /// full state snapshots nobody reads.
    pub fn has_listeners(&self) -> bool {
        self.observer_count() > 0 || self.publisher.subscriber_count() > 0
    }

    // Observers run outside the registry lock so they may register further observers.
    fn observers(&self) -> Vec<Arc<dyn QueueObserver<P>>> {
        self.observers.read().clone()
    }

    pub fn state_changed(&self, state: QueueState<P>) {
        for observer in self.observers() {
            observer.on_state_change(&state);
        }
        self.publisher.publish(QueueEvent::StateChanged(state));
    }

    pub fn progress(&self, progress: ProgressSnapshot) {
        for observer in self.observers() {
            observer.on_progress(&progress);
        }
        self.publisher.publish(QueueEvent::Progress(progress));
    }

    pub fn item_completed(&self, item: BatchItem<P>) {
        for observer in self.observers() {
            observer.on_item_complete(&item);
        }
        self.publisher.publish(QueueEvent::ItemCompleted(item));
    }

    pub fn item_failed(&self, item: BatchItem<P>, error: String) {
        for observer in self.observers() {
            observer.on_item_error(&item, &error);
        }
        self.publisher.publish(QueueEvent::ItemFailed { item, error });
    }

    pub fn batch_completed(&self, items: Vec<BatchItem<P>>) {
        for observer in self.observers() {
            observer.on_batch_complete(&items);
        }
        self.publisher.publish(QueueEvent::BatchCompleted(items));
    }
}

impl<P> fmt::Debug for CallbackDispatcher<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackDispatcher")
            .field("observers", &self.observers.read().len())
            .finish()
    }
}
