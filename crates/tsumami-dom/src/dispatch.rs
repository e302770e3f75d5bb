//! Event dispatch
//!
//! Capture phase runs root to parent, then the target's capture and bubble
//! listeners, then (for bubbling events) parent to root.

use crate::{Document, Element, Event, EventPhase, NodeId};

pub(crate) fn dispatch(target: &Element, mut event: Event) -> Event {
    let doc = target.document();
    let mut path = doc.with_tree(|tree| {
        let mut path = Vec::new();
        let mut cursor = tree.parent_element(target.node_id());
        while let Some(node) = cursor {
            path.push(node);
            cursor = tree.parent_element(node);
        }
        path
    });
    path.reverse();

    tracing::trace!(
        event = event.event_type(),
        target = ?target.node_id(),
        depth = path.len(),
        "dispatching event"
    );

    event.begin_dispatch(target.clone());

    for node in &path {
        invoke_listeners(doc, *node, &mut event, true, EventPhase::Capturing);
        if event.is_propagation_stopped() {
            return finish(event);
        }
    }

    invoke_listeners(doc, target.node_id(), &mut event, true, EventPhase::AtTarget);
    if event.is_immediate_propagation_stopped() {
        return finish(event);
    }
    invoke_listeners(doc, target.node_id(), &mut event, false, EventPhase::AtTarget);
    if event.is_propagation_stopped() || !event.bubbles() {
        return finish(event);
    }

    for node in path.iter().rev() {
        invoke_listeners(doc, *node, &mut event, false, EventPhase::Bubbling);
        if event.is_propagation_stopped() {
            break;
        }
    }
    finish(event)
}

fn finish(mut event: Event) -> Event {
    event.finish_dispatch();
    event
}

fn invoke_listeners(doc: &Document, node: NodeId, event: &mut Event, capture: bool, phase: EventPhase) {
    // Snapshot: the store must not stay borrowed while handlers run
    let listeners = doc.listeners().borrow().get(node, event.event_type(), capture);
    if listeners.is_empty() {
        return;
    }

    let current = Element::new(doc.clone(), node);
    event.enter(current.clone(), phase);

    for listener in listeners {
        if listener.removed.get() {
            continue;
        }
        tracing::trace!(
            event = event.event_type(),
            node = ?node,
            phase = ?phase,
            listener = ?listener.id,
            "invoking listener"
        );
        listener.handler.call(&current, event);
        if event.is_immediate_propagation_stopped() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::{Document, Event, EventPhase, Handler};

    fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &str) -> Handler {
        let log = log.clone();
        let label = label.to_string();
        Handler::new(move |this, event| {
            log.borrow_mut()
                .push(format!("{label}:{}:{:?}", this.tag_name(), event.phase()));
        })
    }

    fn tree() -> (Document, crate::Element, crate::Element, crate::Element) {
        let doc = Document::new();
        let body = doc.body().unwrap();
        let ul = doc.create_element("ul");
        let li = doc.create_element("li");
        body.append_child(&ul).unwrap();
        ul.append_child(&li).unwrap();
        (doc, body, ul, li)
    }

    #[test]
    fn test_phase_order() {
        let (_doc, body, ul, li) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));

        ul.add_event_listener("click", &recorder(&log, "bubble"), false);
        ul.add_event_listener("click", &recorder(&log, "capture"), true);
        li.add_event_listener("click", &recorder(&log, "target"), false);
        body.add_event_listener("click", &recorder(&log, "outer"), false);

        let event = li.dispatch_event(Event::new("click"));

        assert_eq!(
            *log.borrow(),
            vec![
                "capture:ul:Capturing",
                "target:li:AtTarget",
                "bubble:ul:Bubbling",
                "outer:body:Bubbling",
            ]
        );
        assert_eq!(event.phase(), EventPhase::None);
        assert_eq!(event.target(), Some(&li));
    }

    #[test]
    fn test_non_bubbling_event_skips_bubble_phase() {
        let (_doc, _body, ul, li) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));

        ul.add_event_listener("focus", &recorder(&log, "bubble"), false);
        ul.add_event_listener("focus", &recorder(&log, "capture"), true);

        li.dispatch_event(Event::new("focus"));

        assert_eq!(*log.borrow(), vec!["capture:ul:Capturing"]);
    }

    #[test]
    fn test_stop_propagation() {
        let (_doc, body, ul, li) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));

        ul.add_event_listener("click", &Handler::new(|_, e| e.stop_propagation()), false);
        ul.add_event_listener("click", &recorder(&log, "sibling"), false);
        body.add_event_listener("click", &recorder(&log, "outer"), false);

        li.dispatch_event(Event::new("click"));

        // Same-node listeners still run, outer ones do not
        assert_eq!(*log.borrow(), vec!["sibling:ul:Bubbling"]);
    }

    #[test]
    fn test_stop_immediate_propagation() {
        let (_doc, _body, ul, li) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));

        ul.add_event_listener("click", &Handler::new(|_, e| e.stop_immediate_propagation()), false);
        ul.add_event_listener("click", &recorder(&log, "sibling"), false);

        li.dispatch_event(Event::new("click"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_listener_removed_mid_dispatch_is_skipped() {
        let (_doc, _body, ul, li) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));
        let second = recorder(&log, "second");

        let target = ul.clone();
        let victim = second.clone();
        let remover = Handler::new(move |_, _| {
            target.remove_event_listener("click", &victim, false);
        });
        ul.add_event_listener("click", &remover, false);
        ul.add_event_listener("click", &second, false);

        li.dispatch_event(Event::new("click"));
        assert!(log.borrow().is_empty());
        assert_eq!(ul.listener_count(Some("click")), 1);
    }

    #[test]
    fn test_listener_added_mid_dispatch_waits_for_next_event() {
        let (_doc, _body, ul, li) = tree();
        let log = Rc::new(RefCell::new(Vec::new()));
        let late = recorder(&log, "late");

        let target = ul.clone();
        let adder = Handler::new(move |_, _| {
            target.add_event_listener("click", &late, false);
        });
        ul.add_event_listener("click", &adder, false);

        li.dispatch_event(Event::new("click"));
        assert!(log.borrow().is_empty());

        li.dispatch_event(Event::new("click"));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_redispatch_clears_delegate_target() {
        let (doc, _body, ul, li) = tree();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let marker = ul.clone();
        ul.add_event_listener(
            "click",
            &Handler::new(move |_, e| e.set_delegate_target(Some(marker.clone()))),
            true,
        );
        let event = li.dispatch_event(Event::new("click"));
        assert_eq!(event.delegate_target(), Some(&ul));

        let detached = doc.create_element("p");
        let record = seen.clone();
        detached.add_event_listener(
            "click",
            &Handler::new(move |_, e| record.borrow_mut().push(e.delegate_target().cloned())),
            false,
        );
        let event = detached.dispatch_event(event);
        assert_eq!(*seen.borrow(), vec![None]);
        assert_eq!(event.delegate_target(), None);
    }
}
