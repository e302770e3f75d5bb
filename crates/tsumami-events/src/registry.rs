//! Handler registry
//!
//! Registrations are bucketed by event name. Each one records the listener
//! it attached so that removing the entry and detaching the listener happen
//! in the same call.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Weak;

use tsumami_dom::{Element, Handler, ListenerId};

/// Identifier of one registration within a manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

/// Delegation metadata: the selector and the user's own handler
#[derive(Debug, Clone)]
pub(crate) struct Delegation {
    pub(crate) selector: String,
    pub(crate) original: Handler,
}

/// One tracked `(element, event, callback, capture)` binding
#[derive(Debug, Clone)]
pub struct Registration {
    pub(crate) id: RegistrationId,
    pub(crate) element: Element,
    pub(crate) event: String,
    pub(crate) handler: Handler,
    pub(crate) capture: bool,
    pub(crate) listener: ListenerId,
    pub(crate) delegation: Option<Delegation>,
}

impl Registration {
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// Element the listener is attached to
    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    /// The callback attached to the element. For delegated registrations
    /// this is the filtering wrapper, not the user's handler.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn capture(&self) -> bool {
        self.capture
    }

    /// Delegation selector, set only for registrations made by `delegate`
    pub fn selector(&self) -> Option<&str> {
        self.delegation.as_ref().map(|d| d.selector.as_str())
    }

    /// The user's handler behind a delegation wrapper
    pub fn original_handler(&self) -> Option<&Handler> {
        self.delegation.as_ref().map(|d| &d.original)
    }

    pub fn is_delegated(&self) -> bool {
        self.delegation.is_some()
    }

    /// Detach the underlying listener
    pub(crate) fn detach(&self) {
        self.element.remove_event_listener_by_id(self.listener);
        tracing::debug!(
            registration = ?self.id,
            event = %self.event,
            capture = self.capture,
            delegated = self.is_delegated(),
            "removed handler"
        );
    }
}

#[derive(Default)]
pub(crate) struct Registry {
    buckets: HashMap<String, Vec<Registration>>,
    next_id: u64,
}

impl Registry {
    pub(crate) fn next_id(&mut self) -> RegistrationId {
        self.next_id += 1;
        RegistrationId(self.next_id)
    }

    pub(crate) fn insert(&mut self, registration: Registration) {
        self.buckets
            .entry(registration.event.clone())
            .or_default()
            .push(registration);
    }

    /// Remove one registration by id
    pub(crate) fn take(&mut self, id: RegistrationId) -> Option<Registration> {
        self.buckets.values_mut().find_map(|bucket| {
            let pos = bucket.iter().position(|r| r.id == id)?;
            Some(bucket.remove(pos))
        })
    }

    /// Remove every registration matching `pred` in the given bucket, or in
    /// all buckets when `event` is None. A named bucket is created if absent.
    /// Keys are kept, only their contents drain.
    pub(crate) fn drain_where(
        &mut self,
        event: Option<&str>,
        pred: impl Fn(&Registration) -> bool,
    ) -> Vec<Registration> {
        let mut removed = Vec::new();
        let mut drain_bucket = |bucket: &mut Vec<Registration>| {
            let (gone, keep): (Vec<_>, Vec<_>) = bucket.drain(..).partition(|r| pred(r));
            *bucket = keep;
            removed.extend(gone);
        };

        match event {
            Some(event) => drain_bucket(self.buckets.entry(event.to_string()).or_default()),
            None => self.buckets.values_mut().for_each(drain_bucket),
        }
        removed
    }

    /// Remove everything, keys included
    pub(crate) fn clear(&mut self) -> Vec<Registration> {
        self.buckets.drain().flat_map(|(_, bucket)| bucket).collect()
    }

    pub(crate) fn bucket(&self, event: &str) -> &[Registration] {
        self.buckets.get(event).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.buckets.values().flatten()
    }

    pub(crate) fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.buckets.keys().cloned().collect();
        names.sort();
        names
    }

    pub(crate) fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Removes exactly the registration it was returned for.
///
/// Holds the registry weakly: once the manager is gone, unbinding is a no-op.
#[derive(Clone)]
pub struct Unbind {
    pub(crate) registry: Weak<RefCell<Registry>>,
    pub(crate) id: RegistrationId,
}

impl Unbind {
    /// Remove the registration. Returns false if it was already removed.
    pub fn unbind(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let taken = registry.borrow_mut().take(self.id);
        match taken {
            Some(registration) => {
                registration.detach();
                true
            }
            None => false,
        }
    }

    /// True while the registration is still in the registry
    pub fn is_bound(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().iter().any(|r| r.id == self.id))
    }

    pub fn id(&self) -> RegistrationId {
        self.id
    }
}

impl fmt::Debug for Unbind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unbind").field("id", &self.id).finish()
    }
}
