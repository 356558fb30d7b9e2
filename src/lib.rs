//! # hubcast
//!
//! A multicast hub with a built-in adapter stage. Producers push raw inputs;
//! the hub runs each input through a transform and fans the results out to
//! every listener attached at that moment.
//!
//! A transform answers with an [`Outcome`]:
//!
//! - [`Outcome::Value`]: delivered before `next` returns
//! - [`Outcome::Deferred`]: a future, run once and observed by every listener
//! - [`Outcome::Stream`]: a re-subscribable stream, replayed per listener
//!
//! Returning `Err` from the transform fails only that call. Calling
//! [`Hub::error`] or [`Hub::complete`] closes the hub for good; later
//! listeners get the terminal event replayed.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use hubcast::{observer, Hub, Outcome};
//!
//! let hub: Hub<i32, i32, String> = Hub::new(|x: i32| {
//!     if x < 0 {
//!         return Err("boom".to_string());
//!     }
//!     Ok(Outcome::value(x))
//! });
//!
//! let events = Arc::new(Mutex::new(Vec::new()));
//! let (on_next, on_error) = (Arc::clone(&events), Arc::clone(&events));
//! hub.subscribe(
//!     observer(move |v: i32| on_next.lock().unwrap().push(format!("next {v}")))
//!         .with_error(move |e: String| on_error.lock().unwrap().push(format!("error {e}"))),
//! );
//!
//! hub.next(-1);
//! hub.next(2);
//!
//! assert!(!hub.is_closed());
//! assert_eq!(*events.lock().unwrap(), vec!["error boom", "next 2"]);
//! ```

pub mod error;
pub mod hub;
pub mod observer;
pub mod outcome;
mod registry;
pub mod stats;

pub use error::{HubError, Result};
pub use hub::{Hub, HubConfig, HubState, HubStream, HubView, Subscription, SubscriptionGuard};
pub use observer::{observer, FnObserver, Observable, Observer};
pub use outcome::{normalize, Outcome, ResultStream, Source};
pub use registry::ListenerId;
pub use stats::HubStats;
