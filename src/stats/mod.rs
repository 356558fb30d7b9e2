//! Hub statistics
//!
//! Live counters stay internal to the hub; callers only see [`HubStats`]
//! snapshots from `Hub::stats`.
//!
//! ```compile_fail
//! let counters = hubcast::stats::HubCounters::default();
//! ```

pub mod metrics;

pub(crate) use metrics::HubCounters;
pub use metrics::HubStats;
