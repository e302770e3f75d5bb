//! Shared event manager
//!
//! One manager per thread, created on first use. The DOM is single-threaded,
//! so the thread that owns the documents owns the manager.

use crate::EventManager;

thread_local! {
    static EVENTS: EventManager = EventManager::new();
}

/// Handle to the shared manager. Handles share one registry; call
/// `destroy()` on any of them to tear it down.
pub fn events() -> EventManager {
    EVENTS.with(EventManager::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsumami_dom::{Document, Handler};

    #[test]
    fn test_handles_share_state() {
        let doc = Document::new();
        let el = doc.create_element("button");
        let handler = Handler::new(|_, _| {});

        events().on(&el, "click", &handler, false);
        assert_eq!(events().registrations_for(&el).len(), 1);

        events().destroy();
        assert!(events().is_empty());
        assert_eq!(el.listener_count(None), 0);
    }

    #[test]
    fn test_per_thread_instances() {
        let doc = Document::new();
        let el = doc.create_element("button");
        events().on(&el, "click", &Handler::new(|_, _| {}), false);

        let other_thread_len = std::thread::spawn(|| events().len()).join().unwrap();
        assert_eq!(other_thread_len, 0);

        events().destroy();
    }
}
