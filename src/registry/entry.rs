//! Per-listener registry entry

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::observer::Observer;

/// Identifier of an attached listener
///
/// Unique for the lifetime of a hub and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A listener attached to a hub
pub struct ListenerEntry<T, E> {
    id: ListenerId,

    /// The listener's callbacks
    observer: Box<dyn Observer<T, E>>,

    /// Cleared exactly once, when the listener leaves the registry.
    /// Shared with the listener's subscription handle.
    active: Arc<AtomicBool>,
}

impl<T, E> ListenerEntry<T, E> {
    pub(crate) fn new(id: ListenerId, observer: Box<dyn Observer<T, E>>) -> Self {
        Self {
            id,
            observer,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get the listener id
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener still accepts events
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn active_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }

    /// Forward a value if the listener is still active
    pub(crate) fn next(&self, value: T) -> bool {
        if !self.is_active() {
            return false;
        }
        self.observer.on_next(value);
        true
    }

    /// Forward an error if the listener is still active
    pub(crate) fn error(&self, error: E) -> bool {
        if !self.is_active() {
            return false;
        }
        self.observer.on_error(error);
        true
    }

    /// Forward completion if the listener is still active
    pub(crate) fn complete(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.observer.on_complete();
        true
    }

    /// Deactivate the listener and run its teardown
    ///
    /// Returns `false` if it was already released. Must not be called while
    /// holding the hub lock: the teardown is user code.
    pub(crate) fn release(&self) -> bool {
        if self.active.swap(false, Ordering::AcqRel) {
            self.observer.on_unsubscribe();
            true
        } else {
            false
        }
    }
}

impl<T, E> fmt::Debug for ListenerEntry<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
