//! Recording listener shared by the hub tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

use crate::observer::Observer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event<T, E> {
    Next(T),
    Error(E),
    Complete,
    Unsubscribe,
}

pub(crate) struct Recorder<T, E> {
    events: Mutex<Vec<Event<T, E>>>,
    changed: Notify,
}

impl<T, E> Recorder<T, E>
where
    T: Clone,
    E: Clone,
{
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            changed: Notify::new(),
        })
    }

    pub(crate) fn events(&self) -> Vec<Event<T, E>> {
        self.events.lock().unwrap().clone()
    }

    /// Values received, ignoring every other event
    pub(crate) fn values(&self) -> Vec<T> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Next(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    /// Wait until at least `count` events were recorded
    pub(crate) async fn wait_for(&self, count: usize) -> Vec<Event<T, E>> {
        let wait = async {
            loop {
                let notified = self.changed.notified();
                if self.events.lock().unwrap().len() >= count {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("timed out waiting for events");
        self.events()
    }

    fn push(&self, event: Event<T, E>) {
        self.events.lock().unwrap().push(event);
        self.changed.notify_waiters();
    }
}

impl<T, E> Observer<T, E> for Recorder<T, E>
where
    T: Clone + Send,
    E: Clone + Send,
{
    fn on_next(&self, value: T) {
        self.push(Event::Next(value));
    }

    fn on_error(&self, error: E) {
        self.push(Event::Error(error));
    }

    fn on_complete(&self) {
        self.push(Event::Complete);
    }

    fn on_unsubscribe(&self) {
        self.push(Event::Unsubscribe);
    }
}
