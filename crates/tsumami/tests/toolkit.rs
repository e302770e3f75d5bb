//! End-to-end tests for the toolkit facade

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tsumami::{
    by_class_name, by_id, closest, data, data_as, dataset, events, is_numeric, matches, parents,
    qs, qsa, to_camel_case, Document, Element, Error, EventManager, Handler, Nodes,
};

const PAGE: &str = r#"
<div id="main">
    <ul id="list" class="list">
        <li class="item">one</li>
        <li class="item">two</li>
        <li class="item">three</li>
    </ul>
    <p data-string="hello" data-bool="true" data-num="10.10" data-json='{"x": 1, "tags": ["a", "b"]}'>text</p>
    <span id="data-multi" data-dashed-name="dashed-name" data-first="1" data-second="true"></span>
</div>
"#;

fn page() -> Result<Document> {
    Ok(tsumami::parse(PAGE)?)
}

fn required(doc: &Document, id: &str) -> Result<Element> {
    by_id(doc, id).with_context(|| format!("missing #{id}"))
}

#[test]
fn test_selection_helpers() -> Result<()> {
    let doc = page()?;
    let list = required(&doc, "list")?;

    assert_eq!(qsa("li", &doc)?.len(), 3);
    assert_eq!(qs(".item", &list)?.map(|e| e.text_content()), Some("one".to_string()));
    assert!(qs("table", &doc)?.is_none());
    assert_eq!(by_class_name("item", &list).len(), 3);

    let item = qs("li:last-child", &list)?.context("missing last item")?;
    assert!(matches(&item, "#list > .item")?);
    assert_eq!(closest(&item, "div")?.map(|e| e.id()), Some("main".to_string()));
    assert_eq!(parents(&item, Some("[id]"))?.len(), 2);

    assert!(matches!(qsa("li >", &doc), Err(Error::Selector(_))));
    Ok(())
}

#[test]
fn test_data_values() -> Result<()> {
    let doc = page()?;
    let p = qs("[data-string]", &doc)?.context("missing paragraph")?;

    assert_eq!(data(&p, "string"), Some(json!("hello")));
    assert_eq!(data(&p, "random"), None);
    assert_eq!(data(&p, "bool"), Some(json!(true)));
    assert_eq!(data(&p, "num"), Some(json!(10.1)));
    assert_eq!(data(&p, "json"), Some(json!({"x": 1, "tags": ["a", "b"]})));
    Ok(())
}

#[test]
fn test_dataset() -> Result<()> {
    let doc = page()?;
    let el = required(&doc, "data-multi")?;

    let values = dataset(&el);
    assert_eq!(values.len(), 3);
    assert_eq!(values["dashedName"], json!("dashed-name"));
    assert_eq!(values["first"], json!(1));
    assert_eq!(values["second"], json!(true));
    Ok(())
}

#[test]
fn test_data_as() -> Result<()> {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        x: u32,
        tags: Vec<String>,
    }

    let doc = page()?;
    let p = qs("[data-json]", &doc)?.context("missing paragraph")?;

    let payload: Option<Payload> = data_as(&p, "json")?;
    assert_eq!(
        payload,
        Some(Payload {
            x: 1,
            tags: vec!["a".into(), "b".into()]
        })
    );
    assert_eq!(data_as::<u32>(&p, "missing")?, None);

    let err = data_as::<u32>(&p, "string").unwrap_err();
    assert!(matches!(err, Error::Data { ref attr, .. } if attr == "string"));
    Ok(())
}

#[test]
fn test_nodes_chain() -> Result<()> {
    let doc = page()?;
    let list = required(&doc, "list")?;

    let nodes = Nodes::new("li", &list)?;
    assert_eq!(nodes.len(), 3);

    nodes
        .add_class("active")
        .set_attr("data-index", |_: &Element, i: usize| i.to_string())
        .remove_class("item");

    for (i, li) in nodes.iter().enumerate() {
        assert_eq!(li.class_name(), "active");
        assert_eq!(li.get_attribute("data-index"), Some(i.to_string()));
    }
    assert_eq!(nodes.attr("data-index").as_deref(), Some("0"));

    let second = nodes.get(1).context("missing second node")?.clone();
    assert_eq!(nodes.index_of(&second), Some(1));
    assert_eq!(nodes.index_of(&list), None);
    Ok(())
}

#[test]
fn test_nodes_toggle_with_functions() -> Result<()> {
    let doc = page()?;
    let nodes = Nodes::new("li", &doc)?;

    nodes.toggle_class("odd", |_: &Element, i: usize| Some(i % 2 == 0));
    let odd: Vec<bool> = nodes.iter().map(|el| el.class_list().contains("odd")).collect();
    assert_eq!(odd, vec![true, false, true]);

    nodes.toggle_class("odd", None::<bool>);
    let odd: Vec<bool> = nodes.iter().map(|el| el.class_list().contains("odd")).collect();
    assert_eq!(odd, vec![false, true, false]);

    nodes.toggle_class(|el: &Element, _: usize| el.text_content(), true);
    assert!(qs("li.two", &doc)?.is_some());
    Ok(())
}

#[test]
fn test_nodes_from_elements() -> Result<()> {
    let doc = page()?;
    let list = required(&doc, "list")?;

    let single = Nodes::from(list.clone());
    assert_eq!(single.to_vec(), vec![list.clone()]);

    let collected: Nodes = list.children().into_iter().collect();
    assert_eq!(collected.len(), 3);

    let empty = Nodes::from(None::<Element>);
    assert!(empty.is_empty());
    assert_eq!(empty.attr("id"), None);

    let mut seen = Vec::new();
    collected.for_each(|el, i| seen.push((i, el.text_content())));
    assert_eq!(seen[2], (2, "three".to_string()));
    Ok(())
}

#[test]
fn test_delegation_through_facade() -> Result<()> {
    let doc = page()?;
    let list = required(&doc, "list")?;
    let item = qs("li:nth-child(2)", &list)?.context("missing item")?;

    let seen: Rc<RefCell<Vec<String>>> = Rc::default();
    let handler = {
        let seen = seen.clone();
        Handler::new(move |this, _| seen.borrow_mut().push(this.text_content()))
    };

    let manager = EventManager::new();
    manager.delegate(&list, "li", "click", &handler, true)?;
    events().on(&item, "click", &handler, false);

    item.trigger("click");
    assert_eq!(*seen.borrow(), vec!["two", "two"]);

    manager.destroy();
    events().destroy();
    item.trigger("click");
    assert_eq!(seen.borrow().len(), 2);
    Ok(())
}

#[test]
fn test_string_utils() {
    assert_eq!(to_camel_case("this-is-a-string"), "thisIsAString");
    assert_eq!(to_camel_case("this-is a-stRing"), "thisIs aStRing");

    assert!(is_numeric("040"));
    assert!(is_numeric("0xFF"));
    assert!(is_numeric("0Xba"));
    assert!(is_numeric("123e-2"));
    assert!(!is_numeric("\t\t"));
    assert!(!is_numeric("abcdefghijklm1234567890"));
    assert!(!is_numeric("bcfed5.2"));
    assert!(!is_numeric("7.2acdgs"));
}
