//! Tsumami DOM - Document Object Model
//!
//! Arena-backed DOM tree with element handles and browser-style event
//! dispatch (capture, target and bubble phases).

mod classlist;
mod dataset;
mod dispatch;
mod document;
mod element;
mod event;
mod listeners;
mod node;
mod tree;

pub use classlist::DOMTokenList;
pub use dataset::{to_camel_case, to_kebab_case, DOMStringMap};
pub use document::{Document, ParentNode};
pub use element::Element;
pub use event::{event_bubbles, Event, EventInit, EventPhase, EventType, Handler};
pub use listeners::ListenerId;
pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);

    /// Index into the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} not found")]
    NotFound(NodeId),

    #[error("cannot insert {child:?} into {parent:?}: the new child is an ancestor of the parent")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("node {0:?} cannot have children")]
    InvalidParent(NodeId),

    #[error("node belongs to a different document")]
    WrongDocument,
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;
