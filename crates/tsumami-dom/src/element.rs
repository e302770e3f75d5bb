//! Element handle
//!
//! An `Element` is a `(Document, NodeId)` pair. It does not own the node:
//! the node may be detached at any time and the handle stays usable.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::dispatch::dispatch;
use crate::{
    Attribute, DOMStringMap, DOMTokenList, Document, DomError, DomResult, Event, Handler,
    ListenerId, NodeId,
};

/// Reference to an element node
#[derive(Clone)]
pub struct Element {
    doc: Document,
    id: NodeId,
}

impl Element {
    pub(crate) fn new(doc: Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    /// Owning document
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Arena id of the node
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    fn read<R>(&self, f: impl FnOnce(&crate::ElementData) -> R) -> R {
        self.doc.with_tree(|tree| {
            let data = tree
                .element(self.id)
                .expect("element handles always point at element nodes");
            f(data)
        })
    }

    fn write<R>(&self, f: impl FnOnce(&mut crate::ElementData) -> R) -> R {
        self.doc.with_tree_mut(|tree| {
            let data = tree
                .element_mut(self.id)
                .expect("element handles always point at element nodes");
            f(data)
        })
    }

    /// Lowercased tag name
    pub fn tag_name(&self) -> String {
        self.read(|e| e.tag_name.clone())
    }

    /// The `id` attribute, empty if absent
    pub fn id(&self) -> String {
        self.get_attribute("id").unwrap_or_default()
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.read(|e| e.get_attr(name).map(str::to_string))
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.write(|e| e.set_attr(name, value));
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.read(|e| e.has_attr(name))
    }

    pub fn remove_attribute(&self, name: &str) -> bool {
        self.write(|e| e.remove_attr(name))
    }

    /// All attributes in source order
    pub fn attributes(&self) -> Vec<Attribute> {
        self.read(|e| e.attrs.clone())
    }

    /// The `class` attribute, empty if absent
    pub fn class_name(&self) -> String {
        self.get_attribute("class").unwrap_or_default()
    }

    pub fn set_class_name(&self, value: &str) {
        self.set_attribute("class", value);
    }

    /// Snapshot of the class tokens. Write back with `set_class_list`.
    pub fn class_list(&self) -> DOMTokenList {
        DOMTokenList::from_string(&self.class_name())
    }

    pub fn set_class_list(&self, list: &DOMTokenList) {
        self.set_class_name(&list.value());
    }

    /// Snapshot of the `data-*` attributes keyed in camelCase
    pub fn dataset(&self) -> DOMStringMap {
        DOMStringMap::from_attributes(&self.attributes())
    }

    /// Parent element (None at the top of the tree or when detached)
    pub fn parent_element(&self) -> Option<Element> {
        self.doc
            .with_tree(|tree| tree.parent_element(self.id))
            .map(|id| Element::new(self.doc.clone(), id))
    }

    /// Child elements in order
    pub fn children(&self) -> Vec<Element> {
        self.doc
            .with_tree(|tree| tree.element_children(self.id).collect::<Vec<_>>())
            .into_iter()
            .map(|id| Element::new(self.doc.clone(), id))
            .collect()
    }

    /// Append `child` as the last child, moving it if already attached
    pub fn append_child(&self, child: &Element) -> DomResult<()> {
        if !self.doc.ptr_eq(&child.doc) {
            return Err(DomError::WrongDocument);
        }
        self.doc.with_tree_mut(|tree| tree.append_child(self.id, child.id))
    }

    /// Append a text node
    pub fn append_text(&self, content: &str) -> DomResult<()> {
        self.doc.with_tree_mut(|tree| {
            let text = tree.create_text(content);
            tree.append_child(self.id, text)
        })
    }

    /// Detach from the parent. Listeners stay attached.
    pub fn remove(&self) {
        self.doc.with_tree_mut(|tree| tree.detach(self.id));
    }

    /// True if `other` is this element or one of its descendants
    pub fn contains(&self, other: &Element) -> bool {
        self.doc.ptr_eq(&other.doc)
            && self.doc.with_tree(|tree| tree.is_inclusive_ancestor(self.id, other.id))
    }

    /// True if attached to the document tree
    pub fn is_connected(&self) -> bool {
        self.doc.with_tree(|tree| tree.is_connected(self.id))
    }

    pub fn text_content(&self) -> String {
        self.doc.with_tree(|tree| tree.text_content(self.id))
    }

    /// Register a listener. Adding the same handler twice yields two listeners.
    pub fn add_event_listener(&self, event_type: &str, handler: &Handler, capture: bool) -> ListenerId {
        self.doc
            .listeners()
            .borrow_mut()
            .add(self.id, event_type, handler.clone(), capture)
    }

    /// Remove the first listener matching type, handler identity and capture
    pub fn remove_event_listener(&self, event_type: &str, handler: &Handler, capture: bool) -> bool {
        // Bound first: the entry may own the last handle to the closure, whose
        // captures must not drop while the store is borrowed.
        let removed = self
            .doc
            .listeners()
            .borrow_mut()
            .remove(self.id, event_type, handler, capture);
        removed.is_some()
    }

    /// Remove exactly the listener created by one `add_event_listener` call
    pub fn remove_event_listener_by_id(&self, id: ListenerId) -> bool {
        let removed = self.doc.listeners().borrow_mut().remove_by_id(self.id, id);
        removed.is_some()
    }

    /// Number of listeners on this element, optionally for one event type
    pub fn listener_count(&self, event_type: Option<&str>) -> usize {
        self.doc.listeners().borrow().count(self.id, event_type)
    }

    /// Dispatch `event` with this element as target and return it afterwards
    pub fn dispatch_event(&self, event: Event) -> Event {
        dispatch(self, event)
    }

    /// Dispatch a default-initialised event of the given type
    pub fn trigger(&self, event_type: &str) -> Event {
        self.dispatch_event(Event::new(event_type))
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.doc.ptr_eq(&other.doc)
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.doc.id().hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tag, id, class) = self.doc.with_tree(|tree| match tree.element(self.id) {
            Some(e) => (
                e.tag_name.clone(),
                e.id().map(str::to_string),
                e.get_attr("class").map(str::to_string),
            ),
            None => (String::from("?"), None, None),
        });
        let mut out = f.debug_struct("Element");
        out.field("tag", &tag).field("node", &self.id.0);
        if let Some(id) = id {
            out.field("id", &id);
        }
        if let Some(class) = class {
            out.field("class", &class);
        }
        out.finish()
    }
}
