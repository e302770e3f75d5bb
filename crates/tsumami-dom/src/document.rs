//! Document - High-level document API

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::listeners::ListenerStore;
use crate::{DomTree, Element, NodeId};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

struct DocumentInner {
    id: u64,
    tree: RefCell<DomTree>,
    listeners: RefCell<ListenerStore>,
}

/// HTML Document
///
/// A cheap, clonable handle. Clones refer to the same tree. The tree and the
/// listener store sit behind separate cells and are never borrowed while an
/// event handler runs.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Document {
    /// Create a document with `html > (head, body)`
    pub fn new() -> Self {
        let doc = Self::empty();
        doc.with_tree_mut(|tree| {
            let html = tree.create_element("html");
            let head = tree.create_element("head");
            let body = tree.create_element("body");
            // Fresh nodes under a fresh root cannot violate the hierarchy
            let _ = tree.append_child(tree.root(), html);
            let _ = tree.append_child(html, head);
            let _ = tree.append_child(html, body);
        });
        doc
    }

    /// Create a document holding only the document node
    pub fn empty() -> Self {
        Self {
            inner: Rc::new(DocumentInner {
                id: NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed),
                tree: RefCell::new(DomTree::new()),
                listeners: RefCell::new(ListenerStore::default()),
            }),
        }
    }

    /// Process-unique document id
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// True if both handles refer to the same document
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Run `f` with shared access to the tree
    pub fn with_tree<R>(&self, f: impl FnOnce(&DomTree) -> R) -> R {
        f(&self.inner.tree.borrow())
    }

    /// Run `f` with exclusive access to the tree
    pub fn with_tree_mut<R>(&self, f: impl FnOnce(&mut DomTree) -> R) -> R {
        f(&mut self.inner.tree.borrow_mut())
    }

    pub(crate) fn listeners(&self) -> &RefCell<ListenerStore> {
        &self.inner.listeners
    }

    /// Element handle for a node, if the node is an element
    pub fn element(&self, id: NodeId) -> Option<Element> {
        self.with_tree(|tree| tree.element(id).is_some())
            .then(|| Element::new(self.clone(), id))
    }

    /// Create a detached element
    pub fn create_element(&self, tag_name: &str) -> Element {
        let id = self.with_tree_mut(|tree| tree.create_element(tag_name));
        Element::new(self.clone(), id)
    }

    /// The `<html>` element
    pub fn document_element(&self) -> Option<Element> {
        let id = self.with_tree(|tree| tree.element_children(tree.root()).next());
        id.map(|id| Element::new(self.clone(), id))
    }

    /// The `<head>` element
    pub fn head(&self) -> Option<Element> {
        self.top_level_section("head")
    }

    /// The `<body>` element
    pub fn body(&self) -> Option<Element> {
        self.top_level_section("body")
    }

    fn top_level_section(&self, tag: &str) -> Option<Element> {
        let html = self.document_element()?;
        let id = self.with_tree(|tree| {
            tree.element_children(html.node_id())
                .find(|c| tree.element(*c).is_some_and(|e| e.tag_name == tag))
        });
        id.map(|id| Element::new(self.clone(), id))
    }

    /// First connected element with the given id, in document order
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        let found = self.with_tree(|tree| {
            tree.descendant_elements(tree.root())
                .into_iter()
                .find(|n| tree.element(*n).and_then(|e| e.id()) == Some(id))
        });
        found.map(|n| Element::new(self.clone(), n))
    }

    /// Total number of registered listeners across the document
    pub fn listener_count(&self) -> usize {
        self.listeners().borrow().len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Document {}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.inner.id)
            .field("nodes", &self.inner.tree.borrow().len())
            .finish()
    }
}

/// Something that can scope a query: a document or an element
pub trait ParentNode {
    /// Owning document
    fn owner_document(&self) -> &Document;

    /// Node the query is rooted at (excluded from results)
    fn scope_node(&self) -> NodeId;

    /// Descendant elements in document order
    fn descendant_elements(&self) -> Vec<Element> {
        let doc = self.owner_document();
        doc.with_tree(|tree| tree.descendant_elements(self.scope_node()))
            .into_iter()
            .map(|id| Element::new(doc.clone(), id))
            .collect()
    }
}

impl ParentNode for Document {
    fn owner_document(&self) -> &Document {
        self
    }

    fn scope_node(&self) -> NodeId {
        NodeId::ROOT
    }
}

impl ParentNode for Element {
    fn owner_document(&self) -> &Document {
        self.document()
    }

    fn scope_node(&self) -> NodeId {
        self.node_id()
    }
}
