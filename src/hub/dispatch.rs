//! Delivery of one `next` call
//!
//! Every listener in a call's snapshot gets its own subscription to the
//! call's normalized source. A delivery is driven inline for as long as the
//! stream has items ready, so immediate values reach listeners before `next`
//! returns. Whatever is still pending afterwards, including a deferred
//! computation nobody listens to, moves to runtime tasks or to a single
//! fallback thread per call, and resumes when the computation or nested
//! stream wakes it.

use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::{FutureExt, StreamExt};

use super::shared::HubCore;
use crate::error::HubError;
use crate::outcome::{ResultStream, SharedResult};
use crate::registry::ListenerEntry;

/// Pending work collected while dispatching one call
pub(crate) struct Dispatch<T, E> {
    core: Arc<HubCore<T, E>>,
    pending: Vec<BoxFuture<'static, ()>>,
}

impl<T, E> Dispatch<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(core: Arc<HubCore<T, E>>) -> Self {
        Self {
            core,
            pending: Vec::new(),
        }
    }

    /// Run a deferred computation whether or not anyone observes it
    pub(crate) fn drive(&mut self, computation: SharedResult<T, E>) {
        if computation.clone().now_or_never().is_none() {
            self.pending.push(computation.map(|_| ()).boxed());
        }
    }

    /// Deliver what is ready to one listener, keep the rest for later
    pub(crate) fn deliver(&mut self, entry: Arc<ListenerEntry<T, E>>, stream: ResultStream<T, E>) {
        let delivery = Delivery {
            core: Arc::clone(&self.core),
            entry,
            stream,
        };

        if let Some(rest) = delivery.start() {
            self.pending.push(rest.run().boxed());
        }
    }

    /// Hand everything still pending to an executor
    ///
    /// Without a runtime, all pending work of the call shares one thread.
    pub(crate) fn finish(self) {
        if self.pending.is_empty() {
            return;
        }

        let config = &self.core.config;
        if let Some(handle) = config.resolve_runtime() {
            for task in self.pending {
                handle.spawn(task);
            }
            return;
        }

        let name = config.name.clone();
        let tasks = self.pending;
        let spawned = std::thread::Builder::new()
            .name(config.fallback_thread_name.clone())
            .spawn(move || {
                futures::executor::block_on(future::join_all(tasks));
            });

        if let Err(e) = spawned {
            let error = HubError::from(e);
            tracing::error!(hub = %name, error = %error, "Delivery dropped");
        }
    }
}

struct Delivery<T, E> {
    core: Arc<HubCore<T, E>>,
    entry: Arc<ListenerEntry<T, E>>,
    stream: ResultStream<T, E>,
}

impl<T, E> Delivery<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Deliver everything that is ready; returns the delivery if it must wait
    fn start(mut self) -> Option<Self> {
        loop {
            if !self.entry.is_active() {
                return None;
            }
            match self.stream.next().now_or_never() {
                Some(item) => {
                    if self.forward(item) {
                        return None;
                    }
                }
                None => return Some(self),
            }
        }
    }

    /// Forward one stream item; returns `true` when this delivery is over
    fn forward(&self, item: Option<Result<T, E>>) -> bool {
        match item {
            Some(Ok(value)) => {
                if self.entry.next(value) {
                    self.core.counters.record_delivery();
                }
                false
            }
            Some(Err(error)) => {
                self.entry.error(error);
                true
            }
            None => {
                tracing::trace!(
                    hub = %self.core.config.name,
                    listener = %self.entry.id(),
                    "Per-call stream completed"
                );
                true
            }
        }
    }

    async fn run(mut self) {
        while self.entry.is_active() {
            let item = self.stream.next().await;
            if self.forward(item) {
                break;
            }
        }
    }
}
