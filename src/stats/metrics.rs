//! Counters and snapshots for hub activity

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters updated by the hub
#[derive(Debug, Default)]
pub(crate) struct HubCounters {
    inputs: AtomicU64,
    transform_failures: AtomicU64,
    deliveries: AtomicU64,
}

impl HubCounters {
    /// Create zeroed counters
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_input(&self) {
        self.inputs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transform_failure(&self) {
        self.transform_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivery(&self) {
        self.deliveries.fetch_add(1, Ordering::Relaxed);
    }

    /// Accepted `next` calls
    pub(crate) fn inputs(&self) -> u64 {
        self.inputs.load(Ordering::Relaxed)
    }

    /// Transforms that failed synchronously
    pub(crate) fn transform_failures(&self) -> u64 {
        self.transform_failures.load(Ordering::Relaxed)
    }

    /// Values forwarded to listeners
    pub(crate) fn deliveries(&self) -> u64 {
        self.deliveries.load(Ordering::Relaxed)
    }
}

/// Point-in-time statistics for a hub
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubStats {
    /// Number of attached listeners
    pub listeners: usize,
    /// Accepted `next` calls
    pub inputs: u64,
    /// Transforms that failed synchronously
    pub transform_failures: u64,
    /// Values forwarded to listeners, summed over listeners
    pub deliveries: u64,
    /// Whether the hub has terminated
    pub closed: bool,
    /// Whether the hub terminated with an error
    pub has_error: bool,
}

impl HubStats {
    /// Values delivered per accepted input, `None` before any delivery
    pub fn fanout_ratio(&self) -> Option<f64> {
        if self.inputs == 0 || self.deliveries == 0 {
            return None;
        }
        Some(self.deliveries as f64 / self.inputs as f64)
    }
}
