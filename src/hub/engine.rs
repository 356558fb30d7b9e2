//! The transforming hub

use std::fmt;
use std::sync::Arc;

use super::config::HubConfig;
use super::dispatch::Dispatch;
use super::shared::HubCore;
use super::state::HubState;
use super::subscription::Subscription;
use super::view::HubView;
use crate::error::{HubError, Result};
use crate::observer::{Observable, Observer};
use crate::outcome::{prepare, Outcome};
use crate::stats::HubStats;

type TransformFn<I, T, E> = dyn Fn(I) -> std::result::Result<Outcome<T, E>, E> + Send + Sync;

/// Multicast hub with an inline transform
///
/// Producers push inputs with [`Hub::next`]; each input goes through the
/// transform and every resulting value is fanned out to the listeners that
/// were attached when the call started. `Hub` is a cheap handle: clones share
/// the same listeners and state, so listener code may call back into it.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use hubcast::{observer, Hub};
///
/// let hub: Hub<u32, u32, String> = Hub::map(|x| x * 2);
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// hub.subscribe(observer(move |v: u32| sink.lock().unwrap().push(v)));
///
/// hub.next(3);
/// hub.complete();
/// hub.next(4);
///
/// assert_eq!(*seen.lock().unwrap(), vec![6]);
/// ```
pub struct Hub<I, T, E> {
    core: Arc<HubCore<T, E>>,
    transform: Arc<TransformFn<I, T, E>>,
}

impl<I, T, E> Hub<I, T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a hub with the default configuration
    ///
    /// Returning `Err` from the transform fails only the current call: every
    /// listener receives the error and the hub stays open.
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(I) -> std::result::Result<Outcome<T, E>, E> + Send + Sync + 'static,
    {
        Self::with_config(HubConfig::default(), transform)
    }

    /// Create a hub with a custom configuration
    pub fn with_config<F>(config: HubConfig, transform: F) -> Self
    where
        F: Fn(I) -> std::result::Result<Outcome<T, E>, E> + Send + Sync + 'static,
    {
        Self {
            core: Arc::new(HubCore::new(config)),
            transform: Arc::new(transform),
        }
    }

    /// Create a hub whose transform always produces an immediate value
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(I) -> T + Send + Sync + 'static,
    {
        Self::new(move |input| Ok(Outcome::Value(f(input))))
    }

    /// Push an input
    ///
    /// Ignored once the hub is closed.
    pub fn next(&self, input: I) {
        let _ = self.try_next(input);
    }

    /// Push an input, reporting whether the hub accepted it
    ///
    /// Transform failures are not errors here; they are delivered to the
    /// listeners.
    pub fn try_next(&self, input: I) -> Result<()> {
        let Some(snapshot) = self.core.open_snapshot() else {
            tracing::trace!(hub = %self.core.config.name, "Input ignored, hub is closed");
            return Err(HubError::Closed);
        };
        self.core.counters.record_input();

        match (self.transform)(input) {
            Ok(outcome) => {
                let (source, computation) = prepare(outcome);
                let mut dispatch = Dispatch::new(Arc::clone(&self.core));
                if let Some(computation) = computation {
                    dispatch.drive(computation);
                }
                for entry in snapshot.iter().filter(|e| e.is_active()) {
                    dispatch.deliver(Arc::clone(entry), source.open());
                }
                dispatch.finish();
            }
            Err(error) => {
                self.core.counters.record_transform_failure();
                tracing::debug!(
                    hub = %self.core.config.name,
                    listeners = snapshot.len(),
                    "Transform failed"
                );

                for entry in snapshot.iter() {
                    entry.error(error.clone());
                }
            }
        }

        Ok(())
    }

    /// Fail the hub
    ///
    /// Current listeners receive `error` and are detached; later listeners
    /// receive it on subscribe. Ignored if already closed.
    pub fn error(&self, error: E) {
        self.core.terminate(Some(error));
    }

    /// Complete the hub
    ///
    /// Current listeners receive completion and are detached; later listeners
    /// receive it on subscribe. Ignored if already closed.
    pub fn complete(&self) {
        self.core.terminate(None);
    }

    /// Close the hub and drop every listener without notifying them
    pub fn force_close(&self) {
        self.core.force_close();
    }

    /// Attach a listener
    pub fn subscribe<L>(&self, listener: L) -> Subscription
    where
        L: Observer<T, E> + 'static,
    {
        self.core.subscribe(Box::new(listener))
    }

    /// Read-only view that only exposes subscription
    pub fn view(&self) -> HubView<T, E> {
        HubView::new(Arc::clone(&self.core))
    }

    /// Whether the hub has terminated
    pub fn is_closed(&self) -> bool {
        self.core.is_closed()
    }

    /// Whether at least one listener is attached
    pub fn is_observed(&self) -> bool {
        self.core.is_observed()
    }

    /// Whether the hub terminated with an error
    pub fn has_error(&self) -> bool {
        self.core.has_error()
    }

    /// The terminal error, if the hub failed
    pub fn terminal_error(&self) -> Option<E> {
        match self.core.state() {
            HubState::Closed { error } => error,
            HubState::Open => None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> HubState<E> {
        self.core.state()
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.core.listener_count()
    }

    /// Get hub statistics
    pub fn stats(&self) -> HubStats {
        self.core.stats()
    }

    /// Get the hub configuration
    pub fn config(&self) -> &HubConfig {
        &self.core.config
    }
}

impl<I, T, E> Clone for Hub<I, T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            transform: Arc::clone(&self.transform),
        }
    }
}

impl<I, T, E> Observable<T, E> for Hub<I, T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn subscribe<L>(&self, listener: L) -> Subscription
    where
        L: Observer<T, E> + 'static,
    {
        Hub::subscribe(self, listener)
    }
}

impl<I, T, E> fmt::Debug for Hub<I, T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("name", &self.core.config.name)
            .field("closed", &self.is_closed())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}
