// ndeftag/src/session/radio.rs

//! Reference-counted radio-state watching. The underlying platform
//! subscription is acquired when the watcher count transitions 0 -> 1 and
//! released on 1 -> 0.

use std::collections::HashMap;

use log::warn;

use crate::session::events::SubscriberId;
use crate::Result;

/// Platform collaborator delivering radio enabled/disabled transitions.
/// The platform debounces the hardware state itself (the raw transition is
/// not trustworthy for about 1.5s); this crate only consumes the settled
/// boolean via [`RadioWatch::notify`].
pub trait RadioStateSource {
    /// Activate the underlying platform subscription.
    fn activate(&mut self) -> Result<()>;

    /// Release the underlying platform subscription.
    fn deactivate(&mut self) -> Result<()>;
}

/// Watcher registry wrapping a [`RadioStateSource`].
pub struct RadioWatch {
    source: Box<dyn RadioStateSource>,
    next_id: u64,
    watchers: HashMap<u64, Box<dyn FnMut(bool)>>,
}

impl RadioWatch {
    pub fn new(source: Box<dyn RadioStateSource>) -> Self {
        Self {
            source,
            next_id: 0,
            watchers: HashMap::new(),
        }
    }

    /// Register a watcher; activates the source on the first registration.
    pub fn subscribe(&mut self, callback: impl FnMut(bool) + 'static) -> Result<SubscriberId> {
        if self.watchers.is_empty() {
            self.source.activate()?;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.watchers.insert(id, Box::new(callback));
        Ok(SubscriberId::from_raw(id))
    }

    /// Remove a watcher; deactivates the source when the last one leaves.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let removed = self.watchers.remove(&id.raw()).is_some();
        if removed && self.watchers.is_empty() {
            if let Err(err) = self.source.deactivate() {
                warn!("radio source deactivate failed: {err}");
            }
        }
        removed
    }

    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    /// Deliver a debounced radio state to every watcher.
    pub fn notify(&mut self, enabled: bool) {
        for callback in self.watchers.values_mut() {
            callback(enabled);
        }
    }
}

impl std::fmt::Debug for RadioWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadioWatch")
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

/// Source for platforms without a radio-state broadcast; activation is a
/// no-op and no transitions are ever delivered.
#[derive(Debug, Default)]
pub struct NullRadioSource;

impl RadioStateSource for NullRadioSource {
    fn activate(&mut self) -> Result<()> {
        Ok(())
    }

    fn deactivate(&mut self) -> Result<()> {
        Ok(())
    }
}
