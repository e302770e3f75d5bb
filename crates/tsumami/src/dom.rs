//! Selection, class and data helpers

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tsumami_dom::{to_camel_case, Document, Element, ParentNode};

use crate::utils::parse_string;
use crate::{Error, Result};

/// Element with the given id
pub fn by_id(doc: &Document, id: &str) -> Option<Element> {
    doc.get_element_by_id(id)
}

/// Descendants of `ctx` carrying every class in `class_name`
pub fn by_class_name(class_name: &str, ctx: &impl ParentNode) -> Vec<Element> {
    tsumami_css::get_elements_by_class_name(ctx, class_name)
}

/// First descendant of `ctx` matching `selector`
pub fn qs(selector: &str, ctx: &impl ParentNode) -> Result<Option<Element>> {
    Ok(tsumami_css::query_selector(ctx, selector)?)
}

/// All descendants of `ctx` matching `selector`, in document order
pub fn qsa(selector: &str, ctx: &impl ParentNode) -> Result<Vec<Element>> {
    Ok(tsumami_css::query_selector_all(ctx, selector)?)
}

pub fn matches(element: &Element, selector: &str) -> Result<bool> {
    Ok(tsumami_css::matches(element, selector)?)
}

/// Nearest inclusive ancestor matching `selector`
pub fn closest(element: &Element, selector: &str) -> Result<Option<Element>> {
    Ok(tsumami_css::closest(element, selector)?)
}

/// Ancestors of `element`, nearest first, optionally filtered by `selector`
pub fn parents(element: &Element, selector: Option<&str>) -> Result<Vec<Element>> {
    Ok(tsumami_css::parents(element, selector)?)
}

/// Anything that can stand for a list of elements
pub trait IntoElements {
    fn into_elements(self) -> Vec<Element>;
}

impl IntoElements for Element {
    fn into_elements(self) -> Vec<Element> {
        vec![self]
    }
}

impl IntoElements for &Element {
    fn into_elements(self) -> Vec<Element> {
        vec![self.clone()]
    }
}

impl IntoElements for Option<Element> {
    fn into_elements(self) -> Vec<Element> {
        self.into_iter().collect()
    }
}

impl IntoElements for Vec<Element> {
    fn into_elements(self) -> Vec<Element> {
        self
    }
}

impl IntoElements for &[Element] {
    fn into_elements(self) -> Vec<Element> {
        self.to_vec()
    }
}

/// Normalise an element or a collection of elements to a vector
pub fn to_array(elements: impl IntoElements) -> Vec<Element> {
    elements.into_elements()
}

/// Apply `f` to the class list, writing back only if it changed
fn update_classes(element: &Element, f: impl FnOnce(&mut tsumami_dom::DOMTokenList)) {
    let before = element.class_list();
    let mut after = before.clone();
    f(&mut after);
    if after != before {
        element.set_class_list(&after);
    }
}

/// Add one or more space-separated classes
pub fn add_class(element: &Element, class_name: &str) {
    update_classes(element, |list| list.add(&[class_name]));
}

/// Remove one or more space-separated classes
pub fn remove_class(element: &Element, class_name: &str) {
    update_classes(element, |list| list.remove(&[class_name]));
}

pub fn has_class(element: &Element, class_name: &str) -> bool {
    element.class_list().contains(class_name)
}

/// Toggle a class. `Some(true)` always adds, `Some(false)` always removes.
pub fn toggle_class(element: &Element, class_name: &str, toggle: Option<bool>) {
    update_classes(element, |list| match toggle {
        Some(true) => list.add(&[class_name]),
        Some(false) => list.remove(&[class_name]),
        None => {
            for class in class_name.split_whitespace() {
                list.toggle(class, None);
            }
        }
    });
}

/// Parsed value of the `data-{attr}` attribute
pub fn data(element: &Element, attr: &str) -> Option<Value> {
    element
        .get_attribute(&format!("data-{attr}"))
        .map(|value| parse_string(&value))
}

/// All `data-*` attributes keyed in camelCase, values parsed
pub fn dataset(element: &Element) -> Map<String, Value> {
    element
        .attributes()
        .iter()
        .filter_map(|a| {
            let key = a.name.strip_prefix("data-")?;
            Some((to_camel_case(key), parse_string(&a.value)))
        })
        .collect()
}

/// Deserialize the parsed `data-{attr}` attribute into `T`
pub fn data_as<T: DeserializeOwned>(element: &Element, attr: &str) -> Result<Option<T>> {
    data(element, attr)
        .map(serde_json::from_value)
        .transpose()
        .map_err(|source| Error::Data {
            attr: attr.to_string(),
            source,
        })
}
