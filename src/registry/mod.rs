//! Listener registry
//!
//! The registry owns every listener currently attached to a hub. Listeners
//! are keyed by a monotonically increasing id, so ordering by id is attach
//! order. Dispatch never iterates the map directly: it reads a cached,
//! immutable snapshot that is dropped on every mutation and rebuilt lazily.
//!
//! ```text
//!        ListenerRegistry
//!   ┌──────────────────────────┐
//!   │ listeners: BTreeMap<     │   attach / detach / clear
//!   │   ListenerId,            │ ◄──────────────────────── invalidates
//!   │   Arc<ListenerEntry>>    │
//!   │ snapshot: Option<Arc<[]>>│ ──► snapshot() ──► dispatch (frozen)
//!   └──────────────────────────┘
//! ```
//!
//! A dispatch call holds its own `Arc` of the snapshot, so listeners attached
//! or detached while it runs only affect the next call.

pub mod entry;
pub mod store;

pub use entry::{ListenerEntry, ListenerId};
pub use store::{ListenerRegistry, Snapshot};
