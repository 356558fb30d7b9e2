//! Shared hub state
//!
//! `HubCore` holds everything a hub, its views and its subscription handles
//! share: the lifecycle state and listener registry behind one lock, plus
//! configuration and counters. The lock is only held for bookkeeping; every
//! call into listener code happens after it is released.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::config::HubConfig;
use super::state::HubState;
use super::subscription::{Detach, Subscription};
use crate::observer::Observer;
use crate::registry::{ListenerEntry, ListenerId, ListenerRegistry, Snapshot};
use crate::stats::{HubCounters, HubStats};

struct Inner<T, E> {
    state: HubState<E>,
    registry: ListenerRegistry<T, E>,
}

/// State shared by a hub and everything derived from it
pub(crate) struct HubCore<T, E> {
    pub(crate) config: HubConfig,
    pub(crate) counters: HubCounters,
    inner: Mutex<Inner<T, E>>,
}

impl<T, E> HubCore<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(config: HubConfig) -> Self {
        Self {
            config,
            counters: HubCounters::new(),
            inner: Mutex::new(Inner {
                state: HubState::Open,
                registry: ListenerRegistry::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T, E>> {
        // Listener code never runs under this lock, so poisoning only means a
        // panic inside registry bookkeeping; the data is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach a listener, or replay the terminal event if closed
    pub(crate) fn subscribe(self: &Arc<Self>, observer: Box<dyn Observer<T, E>>) -> Subscription {
        let attached = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            match inner.state {
                HubState::Open => {
                    let entry = inner.registry.attach(observer);
                    Ok((entry, inner.registry.len()))
                }
                HubState::Closed { ref error } => Err((error.clone(), observer)),
            }
        };

        match attached {
            Ok((entry, listeners)) => {
                tracing::debug!(
                    hub = %self.config.name,
                    listener = %entry.id(),
                    listeners = listeners,
                    "Listener attached"
                );

                let hub: Weak<dyn Detach> = Arc::downgrade(self) as Weak<dyn Detach>;
                Subscription::attached(entry.id(), entry.active_flag(), hub)
            }
            Err((error, observer)) => {
                tracing::debug!(
                    hub = %self.config.name,
                    has_error = error.is_some(),
                    "Late listener, replaying terminal event"
                );

                match error {
                    Some(error) => observer.on_error(error),
                    None => observer.on_complete(),
                }
                observer.on_unsubscribe();
                Subscription::empty()
            }
        }
    }

    /// Snapshot for one `next` call, `None` once closed
    pub(crate) fn open_snapshot(&self) -> Option<Snapshot<T, E>> {
        let mut inner = self.lock();
        if inner.state.is_closed() {
            return None;
        }
        Some(inner.registry.snapshot())
    }

    /// Close the hub, notify the listeners attached right now, then clear
    ///
    /// Returns `false` if the hub was already closed.
    pub(crate) fn terminate(&self, error: Option<E>) -> bool {
        let snapshot = {
            let mut inner = self.lock();
            if !inner.state.close(error.clone()) {
                return false;
            }
            inner.registry.snapshot()
        };

        // A panicking listener must not leave the others attached to a
        // closed hub; finish the teardown before the panic continues.
        let notified = panic::catch_unwind(AssertUnwindSafe(|| {
            for entry in snapshot.iter() {
                match error {
                    Some(ref error) => entry.error(error.clone()),
                    None => entry.complete(),
                };
            }
        }));

        let cleared = self.lock().registry.clear();
        release_all(&cleared);

        tracing::info!(
            hub = %self.config.name,
            listeners = snapshot.len(),
            has_error = error.is_some(),
            "Hub terminated"
        );

        if let Err(payload) = notified {
            panic::resume_unwind(payload);
        }

        true
    }

    /// Close without notifying anyone
    pub(crate) fn force_close(&self) {
        let cleared = {
            let mut inner = self.lock();
            inner.state.close(None);
            inner.registry.clear()
        };
        release_all(&cleared);

        tracing::info!(
            hub = %self.config.name,
            listeners = cleared.len(),
            "Hub force-closed"
        );
    }

    pub(crate) fn state(&self) -> HubState<E> {
        self.lock().state.clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.lock().state.is_closed()
    }

    pub(crate) fn has_error(&self) -> bool {
        self.lock().state.has_error()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.lock().registry.len()
    }

    pub(crate) fn is_observed(&self) -> bool {
        !self.lock().registry.is_empty()
    }

    pub(crate) fn stats(&self) -> HubStats {
        let (listeners, closed, has_error) = {
            let inner = self.lock();
            (
                inner.registry.len(),
                inner.state.is_closed(),
                inner.state.has_error(),
            )
        };

        HubStats {
            listeners,
            inputs: self.counters.inputs(),
            transform_failures: self.counters.transform_failures(),
            deliveries: self.counters.deliveries(),
            closed,
            has_error,
        }
    }
}

impl<T, E> Detach for HubCore<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn detach(&self, id: ListenerId) {
        let removed = {
            let mut inner = self.lock();
            let entry = inner.registry.detach(id);
            let listeners = inner.registry.len();
            entry.map(|entry| (entry, listeners))
        };

        if let Some((entry, listeners)) = removed {
            entry.release();
            tracing::debug!(
                hub = %self.config.name,
                listener = %id,
                listeners = listeners,
                "Listener detached"
            );
        }
    }
}

fn release_all<T, E>(entries: &[Arc<ListenerEntry<T, E>>]) {
    for entry in entries {
        entry.release();
    }
}
