// ndeftag/src/session/events.rs

//! Notification sink for the session controller: a mapping from subscriber
//! identity to callback. "Remove all" is clearing that mapping.

use std::collections::HashMap;

use crate::tag_info::TagInfo;

/// Notifications raised by the session core and consumed by a presentation
/// layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A technology connection to the held tag was opened.
    TagConnected,
    /// The held tag was released; raised exactly once per connect.
    TagDisconnected,
    /// A tag was read; carries the snapshot including decoded records.
    MessageReceived(TagInfo),
    /// A message was written; carries the fresh post-write snapshot.
    MessagePublished(TagInfo),
    /// A tag was discovered while publishing is armed. The flag reports
    /// whether format (clear) mode is armed.
    TagDiscovered(TagInfo, bool),
    /// Tag discovery was started or stopped.
    ListeningStatusChanged(bool),
    /// The platform radio was enabled or disabled (debounced).
    RadioStatusChanged(bool),
}

/// Opaque subscriber identity handed out by [`EventRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub(crate) fn raw(self) -> u64 {
        self.0
    }
}

/// Observer registry with bulk removal.
#[derive(Default)]
pub struct EventRegistry {
    next_id: u64,
    subscribers: HashMap<u64, Box<dyn FnMut(&Event)>>,
}

impl EventRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback, returning the id needed to remove it again.
    pub fn subscribe(&mut self, callback: impl FnMut(&Event) + 'static) -> SubscriberId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.insert(id, Box::new(callback));
        SubscriberId(id)
    }

    /// Returns false when the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(&id.0).is_some()
    }

    /// Drop every subscriber at once.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// True when nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver `event` to every subscriber in registration-independent order.
    pub fn emit(&mut self, event: &Event) {
        for callback in self.subscribers.values_mut() {
            callback(event);
        }
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
