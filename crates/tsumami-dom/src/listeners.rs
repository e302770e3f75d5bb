//! Event listener storage

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{Handler, NodeId};

/// Identifies one `add_event_listener` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
pub(crate) struct ListenerEntry {
    pub id: ListenerId,
    pub event_type: String,
    pub handler: Handler,
    pub capture: bool,
    /// Set when removed, so an in-flight dispatch snapshot skips it
    pub removed: Rc<Cell<bool>>,
}

/// Listeners per node, in registration order
#[derive(Debug, Default)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, Vec<ListenerEntry>>,
    next_id: u64,
}

impl ListenerStore {
    /// Add a listener. Duplicates are kept as separate entries.
    pub fn add(&mut self, node: NodeId, event_type: &str, handler: Handler, capture: bool) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        self.map.entry(node).or_default().push(ListenerEntry {
            id,
            event_type: event_type.to_string(),
            handler,
            capture,
            removed: Rc::new(Cell::new(false)),
        });
        id
    }

    /// Remove the first listener matching type, handler identity and capture.
    /// The entry is handed back so the caller can drop it outside any borrow.
    pub fn remove(
        &mut self,
        node: NodeId,
        event_type: &str,
        handler: &Handler,
        capture: bool,
    ) -> Option<ListenerEntry> {
        self.remove_where(node, |l| {
            l.event_type == event_type && l.capture == capture && l.handler.ptr_eq(handler)
        })
    }

    /// Remove a listener by id
    pub fn remove_by_id(&mut self, node: NodeId, id: ListenerId) -> Option<ListenerEntry> {
        self.remove_where(node, |l| l.id == id)
    }

    fn remove_where(
        &mut self,
        node: NodeId,
        pred: impl Fn(&ListenerEntry) -> bool,
    ) -> Option<ListenerEntry> {
        let listeners = self.map.get_mut(&node)?;
        let pos = listeners.iter().position(pred)?;

        let entry = listeners.remove(pos);
        entry.removed.set(true);
        if listeners.is_empty() {
            self.map.remove(&node);
        }
        Some(entry)
    }

    /// Snapshot of the listeners of one phase
    pub fn get(&self, node: NodeId, event_type: &str, capture: bool) -> Vec<ListenerEntry> {
        self.map
            .get(&node)
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|l| l.capture == capture && l.event_type == event_type)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of listeners on a node, optionally for one event type
    pub fn count(&self, node: NodeId, event_type: Option<&str>) -> usize {
        self.map.get(&node).map_or(0, |listeners| {
            listeners
                .iter()
                .filter(|l| event_type.is_none_or(|t| l.event_type == t))
                .count()
        })
    }

    /// Total listeners across all nodes
    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_are_independent() {
        let mut store = ListenerStore::default();
        let handler = Handler::new(|_, _| {});
        let node = NodeId(1);

        let first = store.add(node, "click", handler.clone(), false);
        let second = store.add(node, "click", handler.clone(), false);
        assert_ne!(first, second);
        assert_eq!(store.get(node, "click", false).len(), 2);

        assert!(store.remove_by_id(node, first).is_some());
        let remaining = store.get(node, "click", false);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second);
    }

    #[test]
    fn test_remove_respects_capture() {
        let mut store = ListenerStore::default();
        let handler = Handler::new(|_, _| {});
        let node = NodeId(1);
        store.add(node, "click", handler.clone(), true);

        assert!(store.remove(node, "click", &handler, false).is_none());
        assert!(store.remove(node, "click", &handler, true).is_some());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_removed_flag_is_set() {
        let mut store = ListenerStore::default();
        let node = NodeId(3);
        let id = store.add(node, "focus", Handler::new(|_, _| {}), true);
        let snapshot = store.get(node, "focus", true);

        store.remove_by_id(node, id);
        assert!(snapshot[0].removed.get());
        assert_eq!(store.count(node, None), 0);
    }
}
