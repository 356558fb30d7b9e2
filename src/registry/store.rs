//! Listener registry implementation

use std::collections::BTreeMap;
use std::sync::Arc;

use super::entry::{ListenerEntry, ListenerId};
use crate::observer::Observer;

/// Frozen, attach-ordered view of the registry used by one dispatch call
pub type Snapshot<T, E> = Arc<[Arc<ListenerEntry<T, E>>]>;

/// Set of listeners attached to a hub
///
/// Not synchronized on its own; the hub keeps it behind its state lock.
pub struct ListenerRegistry<T, E> {
    /// Attached listeners; ids only grow, so key order is attach order
    listeners: BTreeMap<ListenerId, Arc<ListenerEntry<T, E>>>,

    /// Next id to hand out
    next_id: u64,

    /// Cached dispatch order, `None` after any mutation
    snapshot: Option<Snapshot<T, E>>,
}

impl<T, E> ListenerRegistry<T, E> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            listeners: BTreeMap::new(),
            next_id: 0,
            snapshot: None,
        }
    }

    /// Attach a listener under the next unused id
    pub fn attach(&mut self, observer: Box<dyn Observer<T, E>>) -> Arc<ListenerEntry<T, E>> {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let entry = Arc::new(ListenerEntry::new(id, observer));
        self.listeners.insert(id, Arc::clone(&entry));
        self.snapshot = None;

        entry
    }

    /// Remove a listener
    ///
    /// Returns the removed entry, or `None` if the id is not attached.
    pub fn detach(&mut self, id: ListenerId) -> Option<Arc<ListenerEntry<T, E>>> {
        let removed = self.listeners.remove(&id);
        if removed.is_some() {
            self.snapshot = None;
        }
        removed
    }

    /// Get the attach-ordered listeners, rebuilding the cache if needed
    pub fn snapshot(&mut self) -> Snapshot<T, E> {
        let listeners = &self.listeners;
        let snapshot = self
            .snapshot
            .get_or_insert_with(|| listeners.values().cloned().collect());
        Arc::clone(snapshot)
    }

    /// Remove every listener, returning them in attach order
    pub fn clear(&mut self) -> Vec<Arc<ListenerEntry<T, E>>> {
        self.snapshot = None;
        std::mem::take(&mut self.listeners).into_values().collect()
    }

    /// Number of attached listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is attached
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T, E> Default for ListenerRegistry<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::observer;

    fn noop() -> Box<dyn Observer<u32, ()>> {
        Box::new(observer(|_: u32| {}))
    }

    fn ids(snapshot: &Snapshot<u32, ()>) -> Vec<u64> {
        snapshot.iter().map(|e| e.id().get()).collect()
    }

    #[test]
    fn test_attach_assigns_increasing_ids() {
        let mut registry = ListenerRegistry::new();

        let a = registry.attach(noop());
        let b = registry.attach(noop());
        registry.detach(a.id());
        let c = registry.attach(noop());

        assert_eq!(a.id().get(), 0);
        assert_eq!(b.id().get(), 1);
        // Ids are never reused
        assert_eq!(c.id().get(), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_snapshot_in_attach_order() {
        let mut registry = ListenerRegistry::new();
        for _ in 0..4 {
            registry.attach(noop());
        }
        registry.detach(ListenerId(1));

        assert_eq!(ids(&registry.snapshot()), vec![0, 2, 3]);
    }

    #[test]
    fn test_snapshot_cached_until_mutation() {
        let mut registry = ListenerRegistry::new();
        registry.attach(noop());

        let first = registry.snapshot();
        let second = registry.snapshot();
        assert!(Arc::ptr_eq(&first, &second));

        registry.attach(noop());
        let third = registry.snapshot();
        assert!(!Arc::ptr_eq(&first, &third));

        // The earlier snapshot is frozen
        assert_eq!(ids(&first), vec![0]);
        assert_eq!(ids(&third), vec![0, 1]);
    }

    #[test]
    fn test_detach_idempotent() {
        let mut registry = ListenerRegistry::new();
        let a = registry.attach(noop());

        let before = registry.snapshot();
        assert!(registry.detach(a.id()).is_some());
        assert!(registry.detach(a.id()).is_none());
        assert!(registry.is_empty());

        // Missing id leaves the cache alone
        let after = registry.snapshot();
        assert!(registry.detach(ListenerId(99)).is_none());
        assert!(Arc::ptr_eq(&after, &registry.snapshot()));
        assert_eq!(ids(&before), vec![0]);
    }

    #[test]
    fn test_clear() {
        let mut registry = ListenerRegistry::new();
        registry.attach(noop());
        registry.attach(noop());
        registry.snapshot();

        let removed = registry.clear();

        assert_eq!(removed.len(), 2);
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
    }
}
