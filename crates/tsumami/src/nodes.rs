//! Chainable wrapper over a set of elements

use std::slice;

use tsumami_dom::{Element, ParentNode};

use crate::dom::{self, IntoElements};
use crate::utils::Resolve;
use crate::Result;

/// An ordered set of elements with chainable mutators.
///
/// Arguments taking a [`Resolve`] accept either a value or a function of
/// `(element, index)` evaluated per element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nodes {
    els: Vec<Element>,
}

impl Nodes {
    /// Elements under `ctx` matching `selector`
    pub fn new(selector: &str, ctx: &impl ParentNode) -> Result<Self> {
        let els = dom::qsa(selector, ctx)?;
        tracing::trace!(selector, count = els.len(), "collected nodes");
        Ok(Self { els })
    }

    pub fn len(&self) -> usize {
        self.els.len()
    }

    pub fn is_empty(&self) -> bool {
        self.els.is_empty()
    }

    /// Copy of the underlying elements
    pub fn to_vec(&self) -> Vec<Element> {
        self.els.clone()
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.els.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Element> {
        self.els.iter()
    }

    pub fn for_each(&self, mut f: impl FnMut(&Element, usize)) -> &Self {
        for (i, el) in self.els.iter().enumerate() {
            f(el, i);
        }
        self
    }

    pub fn index_of(&self, target: &Element) -> Option<usize> {
        self.els.iter().position(|el| el == target)
    }

    /// Attribute of the first element
    pub fn attr(&self, name: &str) -> Option<String> {
        self.els.first()?.get_attribute(name)
    }

    /// Set an attribute on every element
    pub fn set_attr(&self, name: &str, value: impl Resolve<String>) -> &Self {
        self.for_each(|el, i| el.set_attribute(name, &value.resolve(el, i)))
    }

    pub fn add_class(&self, class_name: impl Resolve<String>) -> &Self {
        self.for_each(|el, i| dom::add_class(el, &class_name.resolve(el, i)))
    }

    pub fn remove_class(&self, class_name: impl Resolve<String>) -> &Self {
        self.for_each(|el, i| dom::remove_class(el, &class_name.resolve(el, i)))
    }

    /// Toggle a class on every element; see [`dom::toggle_class`]
    pub fn toggle_class(
        &self,
        class_name: impl Resolve<String>,
        toggle: impl Resolve<Option<bool>>,
    ) -> &Self {
        self.for_each(|el, i| {
            dom::toggle_class(el, &class_name.resolve(el, i), toggle.resolve(el, i))
        })
    }
}

impl<T: IntoElements> From<T> for Nodes {
    fn from(elements: T) -> Self {
        Self {
            els: elements.into_elements(),
        }
    }
}

impl FromIterator<Element> for Nodes {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            els: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Nodes {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.els.into_iter()
    }
}

impl<'a> IntoIterator for &'a Nodes {
    type Item = &'a Element;
    type IntoIter = slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.els.iter()
    }
}
