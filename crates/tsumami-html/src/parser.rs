//! HTML5 Parser implementation
//!
//! Parses with html5ever into an RcDom, then copies the nodes into our
//! arena tree.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use tsumami_dom::{Document, DomResult, DomTree, Element, NodeId};

use crate::HtmlError;

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    fn parse_rcdom(&self, html: &str) -> Result<RcDom, HtmlError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        Ok(dom)
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        let dom = self.parse_rcdom(html)?;

        let document = Document::empty();
        document.with_tree_mut(|tree| {
            let root = tree.root();
            self.convert_node(&dom.document, tree, root)
        })?;

        tracing::debug!(nodes = document.with_tree(DomTree::len), "parsed HTML document");
        Ok(document)
    }

    /// Replace the children of `element` with the body content of `html`
    pub fn set_inner_html(&self, element: &Element, html: &str) -> Result<(), HtmlError> {
        let dom = self.parse_rcdom(html)?;
        let target = element.node_id();

        element.document().with_tree_mut(|tree| -> DomResult<()> {
            tree.clear_children(target);
            if let Some(body) = find_element(&dom.document, "body") {
                for child in body.children.borrow().iter() {
                    self.convert_node(child, tree, target)?;
                }
            }
            Ok(())
        })?;

        tracing::debug!(element = ?element, "set inner HTML");
        Ok(())
    }

    /// Convert an RcDom node and its subtree under `parent`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> DomResult<()> {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent)?;
                }
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id)?;
                }
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &attr.value);
                    }
                }
                tree.append_child(parent, id)?;

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id)?;
                }
            }
            // Doctypes and processing instructions have no counterpart in our tree
            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
        }
        Ok(())
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// First element named `local` in preorder
fn find_element(handle: &Handle, local: &str) -> Option<Handle> {
    if let RcNodeData::Element { name, .. } = &handle.data {
        if &*name.local == local {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, local))
}
