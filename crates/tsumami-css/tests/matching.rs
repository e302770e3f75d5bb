//! Selector matching against parsed documents

use anyhow::{Context, Result};
use tsumami_css::{
    closest, get_elements_by_class_name, matches, parents, query_selector, query_selector_all,
    SelectorError, SelectorList,
};
use tsumami_dom::{Document, Element};

const PAGE: &str = r#"
<div id="app" class="wrapper">
    <nav id="nav">
        <ul class="menu">
            <li class="menu-item active"><a href="/home" class="link">Home</a></li>
            <li class="menu-item"><a href="/docs" class="link external" lang="en-US">Docs</a></li>
            <li class="menu-item"><a href="/blog">Blog</a></li>
            <li class="menu-item disabled"><span>Soon</span></li>
        </ul>
    </nav>
    <form id="form">
        <input id="name" type="text" data-role="name">
        <input id="agree" type="checkbox" checked>
        <button id="send" disabled>Send</button>
        <p class="hint"></p>
    </form>
</div>
"#;

fn page() -> Result<Document> {
    Ok(tsumami_html::parse(PAGE)?)
}

fn by_id(doc: &Document, id: &str) -> Result<Element> {
    doc.get_element_by_id(id).with_context(|| format!("missing #{id}"))
}

fn ids(elements: &[Element]) -> Vec<String> {
    elements.iter().map(Element::id).collect()
}

fn hrefs(elements: &[Element]) -> Vec<String> {
    elements
        .iter()
        .map(|e| e.get_attribute("href").unwrap_or_default())
        .collect()
}

#[test]
fn test_simple_selectors() -> Result<()> {
    let doc = page()?;
    let nav = by_id(&doc, "nav")?;

    assert!(matches(&nav, "nav")?);
    assert!(matches(&nav, "NAV")?);
    assert!(matches(&nav, "#nav")?);
    assert!(matches(&nav, "*")?);
    assert!(!matches(&nav, ".menu")?);
    assert!(matches(&nav, "div, nav")?);
    Ok(())
}

#[test]
fn test_combinators() -> Result<()> {
    let doc = page()?;

    let links = query_selector_all(&doc, "#nav li > a")?;
    assert_eq!(hrefs(&links), vec!["/home", "/docs", "/blog"]);

    let after_active = query_selector_all(&doc, "li.active + li a")?;
    assert_eq!(hrefs(&after_active), vec!["/docs"]);

    let later = query_selector_all(&doc, "li.active ~ li")?;
    assert_eq!(later.len(), 3);

    // Descendant matching has to backtrack past the first `div` ancestor
    let deep = query_selector_all(&doc, "div ul a.link")?;
    assert_eq!(deep.len(), 2);
    Ok(())
}

#[test]
fn test_attribute_selectors() -> Result<()> {
    let doc = page()?;

    assert_eq!(hrefs(&query_selector_all(&doc, "a[href^='/d']")?), vec!["/docs"]);
    assert_eq!(hrefs(&query_selector_all(&doc, "a[href$=log]")?), vec!["/blog"]);
    assert_eq!(hrefs(&query_selector_all(&doc, "a[lang|=en]")?), vec!["/docs"]);
    assert_eq!(hrefs(&query_selector_all(&doc, "a[class~=external]")?), vec!["/docs"]);
    assert_eq!(query_selector_all(&doc, "[data-role]")?.len(), 1);
    assert_eq!(query_selector_all(&doc, "input[type=TEXT i]")?.len(), 1);
    assert!(query_selector_all(&doc, "input[type=TEXT]")?.is_empty());
    Ok(())
}

#[test]
fn test_structural_pseudo_classes() -> Result<()> {
    let doc = page()?;

    let first = query_selector_all(&doc, "li:first-child")?;
    assert_eq!(first.len(), 1);
    assert!(first[0].class_list().contains("active"));

    assert!(query_selector_all(&doc, "li:last-child span")?.len() == 1);
    assert_eq!(query_selector_all(&doc, "li:nth-child(odd)")?.len(), 2);
    assert_eq!(query_selector_all(&doc, "li:nth-last-child(1)")?.len(), 1);
    assert_eq!(ids(&query_selector_all(&doc, "input:first-of-type")?), vec!["name"]);
    assert_eq!(ids(&query_selector_all(&doc, "input:nth-of-type(2)")?), vec!["agree"]);
    assert_eq!(query_selector_all(&doc, "p:empty")?.len(), 1);
    assert_eq!(query_selector_all(&doc, "a:only-child")?.len(), 3);

    let root = query_selector_all(&doc, ":root")?;
    assert_eq!(root.len(), 1);
    assert_eq!(root[0].tag_name(), "html");
    Ok(())
}

#[test]
fn test_logical_and_form_pseudo_classes() -> Result<()> {
    let doc = page()?;

    assert_eq!(query_selector_all(&doc, "li:not(.active, .disabled)")?.len(), 2);
    assert_eq!(query_selector_all(&doc, ":is(nav, form) > *")?.len(), 5);
    assert_eq!(ids(&query_selector_all(&doc, ":checked")?), vec!["agree"]);
    assert_eq!(ids(&query_selector_all(&doc, ":disabled")?), vec!["send"]);
    assert_eq!(ids(&query_selector_all(&doc, "input:enabled")?), vec!["name", "agree"]);
    Ok(())
}

#[test]
fn test_closest_is_inclusive() -> Result<()> {
    let doc = page()?;
    let link = query_selector(&doc, "a.external")?.context("missing link")?;

    assert_eq!(closest(&link, "a")?, Some(link.clone()));
    assert_eq!(closest(&link, "#nav")?.map(|e| e.id()), Some("nav".to_string()));
    assert_eq!(closest(&link, "form")?, None);
    Ok(())
}

#[test]
fn test_parents() -> Result<()> {
    let doc = page()?;
    let link = query_selector(&doc, "a.external")?.context("missing link")?;

    let all = parents(&link, None)?;
    let tags: Vec<String> = all.iter().map(Element::tag_name).collect();
    assert_eq!(tags, vec!["li", "ul", "nav", "div", "body", "html"]);

    let filtered = parents(&link, Some("[id]"))?;
    assert_eq!(ids(&filtered), vec!["nav", "app"]);

    // The element itself is never included
    assert!(parents(&link, Some("a"))?.is_empty());
    Ok(())
}

#[test]
fn test_query_scoped_to_element() -> Result<()> {
    let doc = page()?;
    let form = by_id(&doc, "form")?;

    assert_eq!(query_selector_all(&form, "input")?.len(), 2);
    assert!(query_selector(&form, "a")?.is_none());
    // The scope itself is not a candidate, but its ancestors take part in matching
    assert!(query_selector(&form, "form")?.is_none());
    assert_eq!(query_selector_all(&form, "div input")?.len(), 2);
    Ok(())
}

#[test]
fn test_get_elements_by_class_name() -> Result<()> {
    let doc = page()?;

    assert_eq!(get_elements_by_class_name(&doc, "menu-item").len(), 4);
    assert_eq!(get_elements_by_class_name(&doc, " active  menu-item ").len(), 1);
    assert!(get_elements_by_class_name(&doc, "  ").is_empty());

    let nav = by_id(&doc, "nav")?;
    assert_eq!(get_elements_by_class_name(&nav, "link").len(), 2);
    Ok(())
}

#[test]
fn test_detached_elements() {
    let doc = Document::new();
    let item = doc.create_element("li");
    let link = doc.create_element("a");
    item.append_child(&link).unwrap();

    assert!(SelectorList::parse("li > a").unwrap().matches(&link));
    assert!(matches(&item, ":first-child").unwrap());
    assert!(!matches(&item, ":root").unwrap());
}

#[test]
fn test_invalid_selectors() -> Result<()> {
    let doc = page()?;
    let nav = by_id(&doc, "nav")?;

    assert_eq!(matches(&nav, ""), Err(SelectorError::Empty));
    assert!(query_selector_all(&doc, "li >").is_err());
    assert!(closest(&nav, "[href").is_err());
    Ok(())
}
