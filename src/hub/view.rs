//! Read-only hub views
//!
//! A [`HubView`] lets code attach listeners without being able to push
//! input or terminate the hub. [`HubView::into_stream`] adapts it to a
//! `futures::Stream` for consumers that prefer pulling.

use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::shared::HubCore;
use super::subscription::Subscription;
use crate::observer::{Observable, Observer};

/// Subscribe-only handle to a hub
pub struct HubView<T, E> {
    core: Arc<HubCore<T, E>>,
}

impl<T, E> HubView<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(core: Arc<HubCore<T, E>>) -> Self {
        Self { core }
    }

    /// Attach a listener
    pub fn subscribe<L>(&self, listener: L) -> Subscription
    where
        L: Observer<T, E> + 'static,
    {
        self.core.subscribe(Box::new(listener))
    }

    /// Convert into a stream of hub events
    ///
    /// Values arrive as `Ok`, per-call failures and the terminal error as
    /// `Err`. The stream ends once the hub terminates or is force-closed;
    /// dropping it detaches its listener.
    pub fn into_stream(self) -> HubStream<T, E> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(ChannelObserver {
            tx: Mutex::new(Some(tx)),
        });

        HubStream {
            rx: UnboundedReceiverStream::new(rx),
            subscription,
        }
    }
}

impl<T, E> Clone for HubView<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T, E> Observable<T, E> for HubView<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn subscribe<L>(&self, listener: L) -> Subscription
    where
        L: Observer<T, E> + 'static,
    {
        HubView::subscribe(self, listener)
    }
}

impl<T, E> fmt::Debug for HubView<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubView")
            .field("hub", &self.core.config.name)
            .finish()
    }
}

/// Forwards hub events into a channel until released
struct ChannelObserver<T, E> {
    tx: Mutex<Option<mpsc::UnboundedSender<Result<T, E>>>>,
}

impl<T, E> ChannelObserver<T, E> {
    fn send(&self, item: Result<T, E>) {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ref tx) = *tx {
            // The receiver may already be gone
            let _ = tx.send(item);
        }
    }
}

impl<T, E> Observer<T, E> for ChannelObserver<T, E>
where
    T: Send,
    E: Send,
{
    fn on_next(&self, value: T) {
        self.send(Ok(value));
    }

    fn on_error(&self, error: E) {
        self.send(Err(error));
    }

    fn on_complete(&self) {}

    fn on_unsubscribe(&self) {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

/// Stream of events from a hub view
pub struct HubStream<T, E> {
    rx: UnboundedReceiverStream<Result<T, E>>,
    subscription: Subscription,
}

impl<T, E> HubStream<T, E> {
    /// Handle of the listener feeding this stream
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl<T, E> Stream for HubStream<T, E> {
    type Item = Result<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

impl<T, E> Drop for HubStream<T, E> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

impl<T, E> fmt::Debug for HubStream<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubStream")
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}
