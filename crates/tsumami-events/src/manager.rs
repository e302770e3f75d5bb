//! Event manager
//!
//! Attaches handlers to elements and keeps a registry of everything it
//! attached, so handlers can be removed by element, event name, handler
//! identity or delegation selector.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tsumami_css::SelectorList;
use tsumami_dom::{Element, Handler};

use crate::registry::{Delegation, Registration, Registry, Unbind};
use crate::EventError;

/// Events that are delegated in the capture phase whatever the caller asks.
/// They do not bubble, so a container only sees them while capturing.
pub const FORCE_CAPTURE_EVENTS: [&str; 2] = ["focus", "blur"];

fn forces_capture(event: &str) -> bool {
    FORCE_CAPTURE_EVENTS.contains(&event)
}

/// How a delegated handler decides whether an event concerns it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DelegateMatch {
    /// Walk from the event target up to the nearest element matching the
    /// selector. The handler runs with that element as context and
    /// `delegate_target`.
    #[default]
    Closest,
    /// Only test the event target itself. The handler runs with the
    /// container as context and `delegate_target`.
    Target,
}

/// DOM events handler.
///
/// Clones share one registry.
#[derive(Clone, Default)]
pub struct EventManager {
    registry: Rc<RefCell<Registry>>,
    matching: DelegateMatch,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager using the given delegation strategy
    pub fn with_matching(matching: DelegateMatch) -> Self {
        Self {
            registry: Rc::default(),
            matching,
        }
    }

    pub fn matching(&self) -> DelegateMatch {
        self.matching
    }

    /// Add an event handler and return its unbind handle.
    ///
    /// Registering the same handler twice creates two registrations that
    /// fire and unbind independently.
    pub fn on(&self, element: &Element, event: &str, handler: &Handler, capture: bool) -> Unbind {
        self.register(element, event, handler.clone(), capture, None)
    }

    fn register(
        &self,
        element: &Element,
        event: &str,
        handler: Handler,
        capture: bool,
        delegation: Option<Delegation>,
    ) -> Unbind {
        let listener = element.add_event_listener(event, &handler, capture);

        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id();
        tracing::debug!(
            registration = ?id,
            element = ?element,
            event,
            capture,
            selector = delegation.as_ref().map(|d| d.selector.as_str()),
            "added handler"
        );
        registry.insert(Registration {
            id,
            element: element.clone(),
            event: event.to_string(),
            handler,
            capture,
            listener,
            delegation,
        });

        Unbind {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Remove event handlers.
    ///
    /// Every argument that is given narrows the match:
    /// - nothing: every handler, and the registry is reset
    /// - `element`: every handler on that element, across event names
    /// - `element` and `event`: every handler for that pair
    /// - `element`, `event` and `handler`: handlers attached with that exact
    ///   callback and capture flag
    ///
    /// `capture` is only compared when a handler is given. Handlers are
    /// compared by identity. Returns the number of removed registrations;
    /// removing what is not there is not an error.
    pub fn off(
        &self,
        element: Option<&Element>,
        event: Option<&str>,
        handler: Option<&Handler>,
        capture: bool,
    ) -> usize {
        // Removed registrations may own the last handle to a closure; they are
        // dropped after the borrow ends so its captures can reach the manager.
        let removed = {
            let mut registry = self.registry.borrow_mut();
            if element.is_none() && event.is_none() && handler.is_none() {
                registry.clear()
            } else {
                registry.drain_where(event, |r| {
                    element.is_none_or(|el| r.element == *el)
                        && handler.is_none_or(|h| r.handler.ptr_eq(h) && r.capture == capture)
                })
            }
        };

        for registration in &removed {
            registration.detach();
        }
        tracing::debug!(
            element = ?element,
            event,
            removed = removed.len(),
            "off"
        );
        removed.len()
    }

    /// Attach a handler to `element` that runs only for events whose target
    /// matches `selector`, now or in the future.
    ///
    /// Delegation normally captures (`capture = true`); `focus` and `blur`
    /// always capture. The event's `delegate_target` is set before the
    /// handler runs. Fails if `selector` does not parse.
    pub fn delegate(
        &self,
        element: &Element,
        selector: &str,
        event: &str,
        handler: &Handler,
        capture: bool,
    ) -> Result<Unbind, EventError> {
        let selectors = SelectorList::parse(selector).map_err(|source| EventError::Selector {
            selector: selector.to_string(),
            source,
        })?;
        let capture = capture || forces_capture(event);

        let original = handler.clone();
        let wrapper = match self.matching {
            DelegateMatch::Closest => Handler::new(move |_container, e| {
                let Some(target) = e.target().cloned() else {
                    return;
                };
                let matched = selectors.closest(&target);
                e.set_delegate_target(matched.clone());
                if let Some(matched) = matched {
                    original.call(&matched, e);
                }
            }),
            DelegateMatch::Target => Handler::new(move |container, e| {
                let Some(target) = e.target().cloned() else {
                    return;
                };
                if selectors.matches(&target) {
                    e.set_delegate_target(Some(container.clone()));
                    original.call(container, e);
                }
            }),
        };

        let delegation = Delegation {
            selector: selector.to_string(),
            original: handler.clone(),
        };
        Ok(self.register(element, event, wrapper, capture, Some(delegation)))
    }

    /// Remove delegated handlers from `element`.
    ///
    /// Only registrations made by `delegate` are considered. `selector`,
    /// `event` and `handler` narrow the match when given; the handler is
    /// compared with the one passed to `delegate`, along with the capture
    /// flag (forced for `focus` and `blur`). Returns the number removed.
    pub fn undelegate(
        &self,
        element: &Element,
        selector: Option<&str>,
        event: Option<&str>,
        handler: Option<&Handler>,
        capture: bool,
    ) -> usize {
        let removed = self.registry.borrow_mut().drain_where(event, |r| {
            let Some(delegation) = &r.delegation else {
                return false;
            };
            r.element == *element
                && selector.is_none_or(|s| delegation.selector == s)
                && handler.is_none_or(|h| {
                    delegation.original.ptr_eq(h)
                        && r.capture == (capture || forces_capture(&r.event))
                })
        });

        for registration in &removed {
            registration.detach();
        }
        tracing::debug!(
            element = ?element,
            selector,
            event,
            removed = removed.len(),
            "undelegate"
        );
        removed.len()
    }

    /// Remove every handler this manager registered. Safe to call repeatedly.
    pub fn destroy(&self) {
        self.off(None, None, None, false);
    }

    /// Registrations for one event name, in registration order
    pub fn registrations(&self, event: &str) -> Vec<Registration> {
        self.registry.borrow().bucket(event).to_vec()
    }

    /// Registrations attached to `element`
    pub fn registrations_for(&self, element: &Element) -> Vec<Registration> {
        let mut found: Vec<Registration> = self
            .registry
            .borrow()
            .iter()
            .filter(|r| r.element == *element)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.id);
        found
    }

    /// Event names present in the registry, sorted. Names stay listed after
    /// their handlers are removed, until the registry is reset.
    pub fn event_names(&self) -> Vec<String> {
        self.registry.borrow().event_names()
    }

    /// Total number of registrations
    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("registrations", &self.len())
            .field("matching", &self.matching)
            .finish()
    }
}
