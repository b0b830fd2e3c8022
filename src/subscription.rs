use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::coordinator::modal::ModalStyle;
use crate::screen::ScreenKey;
use crate::state::Slot;

/// Identifier of a coordinator instance, used for non-owning parent links
/// and to tag published changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CoordinatorId(u64);

impl CoordinatorId {
    /// Allocate a fresh, process-unique id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        CoordinatorId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CoordinatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coordinator-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryDirection {
    Back,
    Forward,
}

/// What changed in a coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NavigationEvent {
    Presented { slot: Slot, screen: ScreenKey },
    Dismissed { slot: Slot, screen: ScreenKey },
    /// The stack was truncated down to (and including) `depth` entries
    PoppedTo { depth: usize },
    StackReplaced { root: ScreenKey },
    /// All slots cleared ahead of a deep-link resolution
    Reset,
    HistoryMoved { direction: HistoryDirection, cursor: usize },
    Restored,
    ModalPresented { style: ModalStyle, screen: ScreenKey },
    ModalDismissed { screen: ScreenKey },
    ModalsCleared { count: usize },
    TabAdded { tab: String },
    TabRemoved { tab: String },
    TabSelected { tab: String },
}

impl NavigationEvent {
    /// Topic string subscribers can filter on
    pub fn topic(&self) -> &'static str {
        match self {
            NavigationEvent::Presented { .. } => "navigation:presented",
            NavigationEvent::Dismissed { .. } => "navigation:dismissed",
            NavigationEvent::PoppedTo { .. } => "navigation:popped",
            NavigationEvent::StackReplaced { .. } => "navigation:root",
            NavigationEvent::Reset => "navigation:reset",
            NavigationEvent::HistoryMoved { .. } => "navigation:history",
            NavigationEvent::Restored => "navigation:restored",
            NavigationEvent::ModalPresented { .. } => "modal:presented",
            NavigationEvent::ModalDismissed { .. } => "modal:dismissed",
            NavigationEvent::ModalsCleared { .. } => "modal:cleared",
            NavigationEvent::TabAdded { .. } => "tab:added",
            NavigationEvent::TabRemoved { .. } => "tab:removed",
            NavigationEvent::TabSelected { .. } => "tab:selected",
        }
    }
}

/// A completed mutation, published after the state is fully updated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationChange {
    pub coordinator: CoordinatorId,
    #[serde(flatten)]
    pub event: NavigationEvent,
}

impl NavigationChange {
    pub fn topic(&self) -> &'static str {
        self.event.topic()
    }

    /// JSON form, for subscribers that forward changes elsewhere
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

type Handler = Box<dyn Fn(&NavigationChange) + Send>;

/// Subscriptions describe which changes a rendering collaborator wants to receive.
pub enum Subscription {
    /// Every change
    All(Handler),

    /// Changes published under one topic
    Topic { topic: String, handler: Handler },
}

impl Subscription {
    /// Helper to subscribe to every change
    pub fn all<F>(handler: F) -> Self
    where
        F: Fn(&NavigationChange) + Send + 'static,
    {
        Subscription::All(Box::new(handler))
    }

    /// Helper to subscribe to a single topic, e.g. `"navigation:presented"`
    pub fn topic<F>(topic: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&NavigationChange) + Send + 'static,
    {
        Subscription::Topic {
            topic: topic.into(),
            handler: Box::new(handler),
        }
    }

    fn deliver(&self, change: &NavigationChange) {
        match self {
            Subscription::All(handler) => handler(change),
            Subscription::Topic { topic, handler } => {
                if topic == change.topic() {
                    handler(change);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Fan-out of navigation changes to subscribers, in subscription order
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscription)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscription: Subscription) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, subscription));
        id
    }

    /// Returns false if the id was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn publish(&self, change: &NavigationChange) {
        log::debug!("Publishing '{}' from {}", change.topic(), change.coordinator);
        for (_, subscription) in &self.subscribers {
            subscription.deliver(change);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
