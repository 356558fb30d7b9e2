//! Transform results and their normalization
//!
//! A transform may answer an input with a plain value, a deferred
//! computation, or a nested stream. [`normalize`] turns each of those into a
//! [`Source`]: a cold, re-subscribable stream that the dispatcher opens once
//! per listener.
//!
//! ```text
//!   Outcome::Value(v)      ──► Source: once(Ok(v.clone()))          per open
//!   Outcome::Deferred(fut) ──► Source: once(shared(fut))            per open
//!   Outcome::Stream(src)   ──► src, unchanged (fresh work per open)
//! ```
//!
//! A deferred computation is wrapped in [`Shared`] so it runs once no matter
//! how many listeners observe it. A nested source is *not* shared: each
//! listener opens it independently and observes its own run.
//!
//! [`Shared`]: futures::future::Shared

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt, Shared};
use futures::stream::{self, BoxStream, Stream, StreamExt};

/// Stream of results opened by a [`Source`]
pub type ResultStream<T, E> = BoxStream<'static, Result<T, E>>;

type OpenFn<T, E> = dyn Fn() -> ResultStream<T, E> + Send + Sync;

/// A re-subscribable stream factory
///
/// Every call to [`Source::open`] starts a fresh subscription. An `Err` item
/// terminates a subscription; end of stream is completion.
pub struct Source<T, E> {
    open: Arc<OpenFn<T, E>>,
}

impl<T, E> Source<T, E> {
    /// Create a source from a function that opens a new stream per subscription
    pub fn new<F, S>(open: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = Result<T, E>> + Send + 'static,
    {
        Self {
            open: Arc::new(move || open().boxed()),
        }
    }

    /// Open a new subscription
    pub fn open(&self) -> ResultStream<T, E> {
        (self.open)()
    }
}

impl<T, E> Clone for Source<T, E> {
    fn clone(&self) -> Self {
        Self {
            open: Arc::clone(&self.open),
        }
    }
}

impl<T, E> fmt::Debug for Source<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").finish_non_exhaustive()
    }
}

/// What a transform produced for one input
pub enum Outcome<T, E> {
    /// A value available immediately
    Value(T),
    /// A computation that settles later
    Deferred(BoxFuture<'static, Result<T, E>>),
    /// A nested stream of zero or more values
    Stream(Source<T, E>),
}

impl<T, E> Outcome<T, E> {
    /// Immediate value
    pub fn value(value: T) -> Self {
        Outcome::Value(value)
    }

    /// Deferred computation
    pub fn deferred<F>(fut: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Outcome::Deferred(fut.boxed())
    }

    /// Nested stream, reopened for every listener
    pub fn stream<F, S>(open: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = Result<T, E>> + Send + 'static,
    {
        Outcome::Stream(Source::new(open))
    }

    /// Zero or more immediate values
    pub fn iter<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        E: Send + 'static,
    {
        let values: Arc<[T]> = values.into_iter().collect();
        Outcome::stream(move || {
            let values = Arc::clone(&values);
            stream::iter((0..values.len()).map(move |i| Ok(values[i].clone())))
        })
    }

    fn kind(&self) -> &'static str {
        match self {
            Outcome::Value(_) => "value",
            Outcome::Deferred(_) => "deferred",
            Outcome::Stream(_) => "stream",
        }
    }
}

impl<T, E> fmt::Debug for Outcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Outcome").field(&self.kind()).finish()
    }
}

/// Handle to a deferred computation shared by every listener of one call
pub(crate) type SharedResult<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// Normalize a transform outcome into a source
pub fn normalize<T, E>(outcome: Outcome<T, E>) -> Source<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    prepare(outcome).0
}

/// Normalize, also handing back the deferred computation if there is one
///
/// The hub drives the returned handle itself so the computation runs even
/// when nobody is listening.
pub(crate) fn prepare<T, E>(outcome: Outcome<T, E>) -> (Source<T, E>, Option<SharedResult<T, E>>)
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    match outcome {
        Outcome::Stream(source) => (source, None),
        Outcome::Deferred(fut) => {
            let shared = fut.shared();
            let observed = shared.clone();
            (
                Source::new(move || stream::once(observed.clone())),
                Some(shared),
            )
        }
        Outcome::Value(value) => (
            Source::new(move || stream::once(future::ready(Ok(value.clone())))),
            None,
        ),
    }
}
