//! The transforming multicast hub
//!
//! ```text
//!   producer ──► Hub::next(input)
//!                  │ 1. freeze listener snapshot
//!                  │ 2. transform(input) ──► Err(e) ──► on_error(e) to snapshot
//!                  │                    └──► Ok(outcome)
//!                  │ 3. normalize(outcome) ──► Source
//!                  ▼
//!        ┌─────────┼──────────┐
//!        ▼         ▼          ▼            one subscription per listener
//!   source.open() open()    open()
//!        │         │          │
//!        ▼         ▼          ▼
//!   [Listener] [Listener] [Listener]      on_next / on_error
//! ```
//!
//! `error` and `complete` close the hub once: the listeners of that moment
//! get the terminal event and are cleared, and listeners arriving later get
//! the same terminal event replayed instead of being attached.

pub mod config;
mod shared;
mod dispatch;
pub mod engine;
pub mod state;
pub mod subscription;
pub mod view;

pub use config::HubConfig;
pub use engine::Hub;
pub use state::HubState;
pub use subscription::{Subscription, SubscriptionGuard};
pub use view::{HubStream, HubView};

#[cfg(test)]
pub(crate) mod testing;
