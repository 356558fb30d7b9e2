//! Subscription handles
//!
//! A [`Subscription`] is returned for every attached listener. Disposing it
//! removes exactly that listener from its hub. Handles handed out by a closed
//! hub are inert from the start.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::registry::ListenerId;

/// Removes listeners by id; implemented by the hub core
pub(crate) trait Detach: Send + Sync {
    fn detach(&self, id: ListenerId);
}

struct Handle {
    id: ListenerId,
    /// Shared with the registry entry
    active: Arc<AtomicBool>,
    hub: Weak<dyn Detach>,
}

/// Handle to an attached listener
///
/// Cloning shares the handle. Dropping it does not detach the listener; use
/// [`Subscription::into_guard`] for scoped listeners.
#[derive(Clone, Default)]
pub struct Subscription {
    handle: Option<Arc<Handle>>,
}

impl Subscription {
    /// A handle that is already closed
    pub fn empty() -> Self {
        Self { handle: None }
    }

    pub(crate) fn attached(id: ListenerId, active: Arc<AtomicBool>, hub: Weak<dyn Detach>) -> Self {
        Self {
            handle: Some(Arc::new(Handle { id, active, hub })),
        }
    }

    /// Id of the listener, `None` for an inert handle
    pub fn id(&self) -> Option<ListenerId> {
        self.handle.as_ref().map(|h| h.id)
    }

    /// Whether the listener no longer receives events
    pub fn is_closed(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(true, |h| !h.active.load(Ordering::Acquire))
    }

    /// Detach the listener from its hub
    ///
    /// Idempotent. Deliveries still in flight for this listener are dropped;
    /// other listeners are unaffected.
    pub fn unsubscribe(&self) {
        let Some(ref handle) = self.handle else {
            return;
        };
        if !handle.active.load(Ordering::Acquire) {
            return;
        }

        match handle.hub.upgrade() {
            Some(hub) => hub.detach(handle.id),
            None => handle.active.store(false, Ordering::Release),
        }
    }

    /// Wrap the handle so the listener is detached on drop
    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard { subscription: self }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Detaches its listener when dropped
#[must_use = "the listener is detached as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SubscriptionGuard {
    subscription: Subscription,
}

impl SubscriptionGuard {
    /// The guarded handle
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Release the handle without detaching
    pub fn disarm(mut self) -> Subscription {
        std::mem::take(&mut self.subscription)
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
