//! Selector model and matching
//!
//! Complex selectors are matched right to left against the arena tree, with
//! backtracking on descendant and subsequent-sibling combinators.

use std::fmt;
use std::str::FromStr;

use tsumami_dom::{DomTree, Element, NodeId, ParentNode};

use crate::parser::parse_selector_list;
use crate::SelectorError;

/// A parsed, comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    source: String,
    selectors: Vec<ComplexSelector>,
}

/// Compound selectors joined by combinators, left to right
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub parts: Vec<SelectorPart>,
}

/// One compound selector and the combinator linking it to the previous one
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorPart {
    /// None for the leftmost part
    pub combinator: Option<Combinator>,
    pub components: Vec<SelectorComponent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// A simple selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (lowercased tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :not(), etc.
    PseudoClass(PseudoClass),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (matcher, value) = match (&self.matcher, value) {
            (_, None) => return false,
            (None, Some(_)) => return true,
            (Some(matcher), Some(value)) => (matcher, value),
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };
        let value = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => value == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                value.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                value == expected || value.starts_with(&format!("{expected}-"))
            }
            // Empty needles never match for the substring family
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && value.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && value.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && value.contains(&fold(expected))
            }
        }
    }
}

/// Supported pseudo-classes
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),
    Not(SelectorList),
    Is(SelectorList),
    Where(SelectorList),
    Checked,
    Disabled,
    Enabled,
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse "2n+1", "odd", "even", "-n+3", "4"
    pub fn parse(s: &str) -> Option<Self> {
        let s: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::new(2, 1)),
            "even" => return Some(Self::new(2, 0)),
            _ => {}
        }

        let Some(n_pos) = s.find('n') else {
            return s.parse().ok().map(|b| Self::new(0, b));
        };

        let a = match &s[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            a => a.parse().ok()?,
        };
        let b = match &s[n_pos + 1..] {
            "" => 0,
            rest if rest.starts_with('+') || rest.starts_with('-') => rest.parse().ok()?,
            _ => return None,
        };
        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        if self.a == 0 {
            return n == self.b;
        }

        let diff = n - self.b;
        diff % self.a == 0 && diff / self.a >= 0
    }
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let selectors = parse_selector_list(source)?;
        Ok(Self::from_parts(source.trim(), selectors))
    }

    pub(crate) fn from_parts(source: &str, selectors: Vec<ComplexSelector>) -> Self {
        Self {
            source: source.to_string(),
            selectors,
        }
    }

    /// Source text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn selectors(&self) -> &[ComplexSelector] {
        &self.selectors
    }

    /// True if the element matches any selector in the list
    pub fn matches(&self, element: &Element) -> bool {
        element
            .document()
            .with_tree(|tree| self.matches_node(tree, element.node_id()))
    }

    /// Nearest inclusive ancestor matching the list
    pub fn closest(&self, element: &Element) -> Option<Element> {
        let doc = element.document();
        let found = doc.with_tree(|tree| {
            let mut cursor = Some(element.node_id());
            while let Some(node) = cursor {
                if self.matches_node(tree, node) {
                    return Some(node);
                }
                cursor = tree.parent_element(node);
            }
            None
        });
        found.and_then(|id| doc.element(id))
    }

    /// Ancestors (nearest first) matching the list
    pub fn parents(&self, element: &Element) -> Vec<Element> {
        let doc = element.document();
        let found = doc.with_tree(|tree| {
            let mut out = Vec::new();
            let mut cursor = tree.parent_element(element.node_id());
            while let Some(node) = cursor {
                if self.matches_node(tree, node) {
                    out.push(node);
                }
                cursor = tree.parent_element(node);
            }
            out
        });
        found.into_iter().filter_map(|id| doc.element(id)).collect()
    }

    /// Matching descendants of `scope` in document order
    pub fn query_all(&self, scope: &impl ParentNode) -> Vec<Element> {
        let doc = scope.owner_document();
        let found = doc.with_tree(|tree| {
            tree.descendant_elements(scope.scope_node())
                .into_iter()
                .filter(|node| self.matches_node(tree, *node))
                .collect::<Vec<_>>()
        });
        found.into_iter().filter_map(|id| doc.element(id)).collect()
    }

    /// First matching descendant of `scope`
    pub fn query_first(&self, scope: &impl ParentNode) -> Option<Element> {
        let doc = scope.owner_document();
        let found = doc.with_tree(|tree| {
            tree.descendant_elements(scope.scope_node())
                .into_iter()
                .find(|node| self.matches_node(tree, *node))
        });
        found.and_then(|id| doc.element(id))
    }

    /// Match against a raw node
    pub fn matches_node(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.element(node).is_some() && self.selectors.iter().any(|s| s.matches_node(tree, node))
    }
}

impl FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl ComplexSelector {
    fn matches_node(&self, tree: &DomTree, node: NodeId) -> bool {
        match self.parts.len() {
            0 => false,
            n => self.matches_from(tree, n - 1, node),
        }
    }

    /// Does `parts[..=idx]` match with `parts[idx]` anchored at `node`?
    fn matches_from(&self, tree: &DomTree, idx: usize, node: NodeId) -> bool {
        let part = &self.parts[idx];
        if !part.components.iter().all(|c| match_component(c, tree, node)) {
            return false;
        }
        if idx == 0 {
            return true;
        }

        match part.combinator.unwrap_or(Combinator::Descendant) {
            Combinator::Child => tree
                .parent_element(node)
                .is_some_and(|p| self.matches_from(tree, idx - 1, p)),
            Combinator::Descendant => {
                let mut cursor = tree.parent_element(node);
                while let Some(ancestor) = cursor {
                    if self.matches_from(tree, idx - 1, ancestor) {
                        return true;
                    }
                    cursor = tree.parent_element(ancestor);
                }
                false
            }
            Combinator::NextSibling => tree
                .prev_element_sibling(node)
                .is_some_and(|s| self.matches_from(tree, idx - 1, s)),
            Combinator::SubsequentSibling => {
                let mut cursor = tree.prev_element_sibling(node);
                while let Some(sibling) = cursor {
                    if self.matches_from(tree, idx - 1, sibling) {
                        return true;
                    }
                    cursor = tree.prev_element_sibling(sibling);
                }
                false
            }
        }
    }
}

/// Position of an element among its element siblings
struct SiblingPosition {
    /// 1-based index among siblings
    index: usize,
    count: usize,
    /// 1-based index among same-type siblings
    type_index: usize,
    type_count: usize,
}

fn sibling_position(tree: &DomTree, node: NodeId) -> SiblingPosition {
    let Some(parent) = tree.parent(node) else {
        return SiblingPosition {
            index: 1,
            count: 1,
            type_index: 1,
            type_count: 1,
        };
    };
    let tag = tree.element(node).map(|e| e.tag_name.as_str()).unwrap_or("");

    let mut pos = SiblingPosition {
        index: 0,
        count: 0,
        type_index: 0,
        type_count: 0,
    };
    let mut seen_self = false;
    for sibling in tree.element_children(parent) {
        let same_type = tree.element(sibling).is_some_and(|e| e.tag_name == tag);
        pos.count += 1;
        if same_type {
            pos.type_count += 1;
        }
        if !seen_self {
            pos.index += 1;
            if same_type {
                pos.type_index += 1;
            }
        }
        if sibling == node {
            seen_self = true;
        }
    }
    pos
}

const FORM_CONTROLS: [&str; 6] = ["button", "input", "select", "textarea", "option", "fieldset"];

/// Match a selector component against an element
fn match_component(component: &SelectorComponent, tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.element(node) else {
        return false;
    };

    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => element.tag_name.eq_ignore_ascii_case(tag),
        SelectorComponent::Id(id) => element.id() == Some(id.as_str()),
        SelectorComponent::Class(class) => element.has_class(class),
        SelectorComponent::Attribute(attr) => attr.matches(element.get_attr(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match pseudo {
            PseudoClass::Root => tree.parent(node) == Some(tree.root()),
            PseudoClass::Empty => tree
                .children(node)
                .all(|c| tree.get(c).is_some_and(|n| !n.is_element() && n.as_text().is_none_or(str::is_empty))),
            PseudoClass::FirstChild => sibling_position(tree, node).index == 1,
            PseudoClass::LastChild => {
                let pos = sibling_position(tree, node);
                pos.index == pos.count
            }
            PseudoClass::OnlyChild => sibling_position(tree, node).count == 1,
            PseudoClass::FirstOfType => sibling_position(tree, node).type_index == 1,
            PseudoClass::LastOfType => {
                let pos = sibling_position(tree, node);
                pos.type_index == pos.type_count
            }
            PseudoClass::OnlyOfType => sibling_position(tree, node).type_count == 1,
            PseudoClass::NthChild(expr) => expr.matches(sibling_position(tree, node).index as i32),
            PseudoClass::NthLastChild(expr) => {
                let pos = sibling_position(tree, node);
                expr.matches((pos.count - pos.index + 1) as i32)
            }
            PseudoClass::NthOfType(expr) => {
                expr.matches(sibling_position(tree, node).type_index as i32)
            }
            PseudoClass::NthLastOfType(expr) => {
                let pos = sibling_position(tree, node);
                expr.matches((pos.type_count - pos.type_index + 1) as i32)
            }
            PseudoClass::Not(list) => !list.matches_node(tree, node),
            PseudoClass::Is(list) | PseudoClass::Where(list) => list.matches_node(tree, node),
            PseudoClass::Checked => {
                element.has_attr("checked") || (element.tag_name == "option" && element.has_attr("selected"))
            }
            PseudoClass::Disabled => {
                FORM_CONTROLS.contains(&element.tag_name.as_str()) && element.has_attr("disabled")
            }
            PseudoClass::Enabled => {
                FORM_CONTROLS.contains(&element.tag_name.as_str()) && !element.has_attr("disabled")
            }
        },
    }
}
