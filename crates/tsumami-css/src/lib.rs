//! Tsumami CSS - selector engine
//!
//! Parses selector lists and matches them against `tsumami-dom` trees.
//! Supports type, universal, id, class and attribute selectors, the four
//! combinators, and the structural and logical pseudo-classes.

mod parser;
mod selectors;

pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, NthExpression, PseudoClass,
    SelectorComponent, SelectorList, SelectorPart,
};

use tsumami_dom::{Element, ParentNode};

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected {found:?} at offset {offset} in `{selector}`")]
    Unexpected {
        selector: String,
        offset: usize,
        found: char,
    },

    #[error("unexpected end of selector `{0}`")]
    UnexpectedEnd(String),

    #[error("unknown pseudo-class `:{0}`")]
    UnknownPseudoClass(String),

    #[error("pseudo-elements cannot match elements: `{0}`")]
    PseudoElement(String),

    #[error("invalid An+B expression `{0}`")]
    InvalidNth(String),
}

/// Does `element` match `selector`?
pub fn matches(element: &Element, selector: &str) -> Result<bool, SelectorError> {
    Ok(SelectorList::parse(selector)?.matches(element))
}

/// Nearest inclusive ancestor of `element` matching `selector`
pub fn closest(element: &Element, selector: &str) -> Result<Option<Element>, SelectorError> {
    Ok(SelectorList::parse(selector)?.closest(element))
}

/// Ancestors of `element`, nearest first, optionally filtered by `selector`.
/// The element itself is never included.
pub fn parents(element: &Element, selector: Option<&str>) -> Result<Vec<Element>, SelectorError> {
    match selector {
        Some(selector) => Ok(SelectorList::parse(selector)?.parents(element)),
        None => {
            let mut out = Vec::new();
            let mut cursor = element.parent_element();
            while let Some(parent) = cursor {
                cursor = parent.parent_element();
                out.push(parent);
            }
            Ok(out)
        }
    }
}

/// First descendant of `scope` matching `selector`, in document order
pub fn query_selector(scope: &impl ParentNode, selector: &str) -> Result<Option<Element>, SelectorError> {
    Ok(SelectorList::parse(selector)?.query_first(scope))
}

/// All descendants of `scope` matching `selector`, in document order
pub fn query_selector_all(scope: &impl ParentNode, selector: &str) -> Result<Vec<Element>, SelectorError> {
    Ok(SelectorList::parse(selector)?.query_all(scope))
}

/// Descendants carrying every class in the whitespace-separated `class_names`.
/// An empty list matches nothing.
pub fn get_elements_by_class_name(scope: &impl ParentNode, class_names: &str) -> Vec<Element> {
    let wanted: Vec<&str> = class_names.split_whitespace().collect();
    if wanted.is_empty() {
        return Vec::new();
    }

    let doc = scope.owner_document();
    let found = doc.with_tree(|tree| {
        tree.descendant_elements(scope.scope_node())
            .into_iter()
            .filter(|node| {
                tree.element(*node)
                    .is_some_and(|e| wanted.iter().all(|class| e.has_class(class)))
            })
            .collect::<Vec<_>>()
    });
    found.into_iter().filter_map(|id| doc.element(id)).collect()
}
