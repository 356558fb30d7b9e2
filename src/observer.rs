//! Listener capability set and the subscribe contract
//!
//! An [`Observer`] is anything that can receive output, error and completion
//! events. An [`Observable`] is anything a listener can be attached to; the
//! hub and its read-only [`HubView`](crate::HubView) both implement it.

use std::sync::Arc;

use crate::hub::Subscription;

/// Receiver of hub events
///
/// All methods take `&self`: the same listener may be reached from the
/// producer's thread and from a resumed delivery task, so implementations
/// use interior mutability for any state they keep.
pub trait Observer<T, E>: Send + Sync {
    /// A value was produced
    fn on_next(&self, value: T);

    /// A per-call failure or the hub's terminal error
    fn on_error(&self, error: E);

    /// The hub completed
    fn on_complete(&self);

    /// The listener left the registry
    ///
    /// Called exactly once, after any terminal event, whether the listener
    /// was disposed through its handle, cleared on termination, or dropped
    /// by a force close.
    fn on_unsubscribe(&self) {}
}

impl<T, E, L> Observer<T, E> for Arc<L>
where
    L: Observer<T, E> + ?Sized,
{
    fn on_next(&self, value: T) {
        (**self).on_next(value)
    }

    fn on_error(&self, error: E) {
        (**self).on_error(error)
    }

    fn on_complete(&self) {
        (**self).on_complete()
    }

    fn on_unsubscribe(&self) {
        (**self).on_unsubscribe()
    }
}

/// Something a listener can be attached to
pub trait Observable<T, E> {
    /// Attach a listener, returning the handle that detaches it
    fn subscribe<L>(&self, listener: L) -> Subscription
    where
        L: Observer<T, E> + 'static;
}

type NextFn<T> = Box<dyn Fn(T) + Send + Sync>;
type ErrorFn<E> = Box<dyn Fn(E) + Send + Sync>;
type CompleteFn = Box<dyn Fn() + Send + Sync>;

/// Closure-backed observer, built with [`observer`]
pub struct FnObserver<T, E> {
    next: NextFn<T>,
    error: Option<ErrorFn<E>>,
    complete: Option<CompleteFn>,
}

/// Create an observer from an output callback
///
/// ```
/// use hubcast::observer;
///
/// let listener = observer(|v: u32| println!("got {v}"))
///     .with_error(|e: String| eprintln!("failed: {e}"))
///     .with_complete(|| println!("done"));
/// # let _ = listener;
/// ```
pub fn observer<T, E, F>(next: F) -> FnObserver<T, E>
where
    F: Fn(T) + Send + Sync + 'static,
{
    FnObserver {
        next: Box::new(next),
        error: None,
        complete: None,
    }
}

impl<T, E> FnObserver<T, E> {
    /// Set the error callback
    pub fn with_error<F>(mut self, f: F) -> Self
    where
        F: Fn(E) + Send + Sync + 'static,
    {
        self.error = Some(Box::new(f));
        self
    }

    /// Set the completion callback
    pub fn with_complete<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.complete = Some(Box::new(f));
        self
    }
}

impl<T, E> Observer<T, E> for FnObserver<T, E> {
    fn on_next(&self, value: T) {
        (self.next)(value)
    }

    fn on_error(&self, error: E) {
        match self.error {
            Some(ref f) => f(error),
            None => tracing::warn!("Error dropped: listener has no error callback"),
        }
    }

    fn on_complete(&self) {
        if let Some(ref f) = self.complete {
            f();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_fn_observer_callbacks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let completions = Arc::new(AtomicU32::new(0));

        let next_seen = Arc::clone(&seen);
        let error_seen = Arc::clone(&seen);
        let done = Arc::clone(&completions);

        let obs = observer(move |v: i32| next_seen.lock().unwrap().push(format!("next {v}")))
            .with_error(move |e: &'static str| error_seen.lock().unwrap().push(format!("error {e}")))
            .with_complete(move || {
                done.fetch_add(1, Ordering::Relaxed);
            });

        Observer::on_next(&obs, 1);
        Observer::on_error(&obs, "boom");
        Observer::on_complete(&obs);
        Observer::on_unsubscribe(&obs);

        assert_eq!(*seen.lock().unwrap(), vec!["next 1", "error boom"]);
        assert_eq!(completions.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_missing_callbacks_are_ignored() {
        let obs: FnObserver<i32, &str> = observer(|_| {});

        // No error or completion callback registered
        Observer::on_error(&obs, "dropped");
        Observer::on_complete(&obs);
    }

    #[test]
    fn test_arc_forwards() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);
        let shared: Arc<FnObserver<u32, ()>> = Arc::new(observer(move |v: u32| {
            counter.fetch_add(v, Ordering::Relaxed);
        }));

        let a = Arc::clone(&shared);
        a.on_next(2);
        shared.on_next(3);

        assert_eq!(count.load(Ordering::Relaxed), 5);
    }
}
