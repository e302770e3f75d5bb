//! Tsumami
//!
//! Small DOM toolkit: selection and class helpers, typed `data-*` access,
//! a delegated event manager and a chainable wrapper over element sets.
//!
//! ```ignore
//! let doc = tsumami::parse(html)?;
//! let nav = tsumami::by_id(&doc, "nav").unwrap();
//!
//! tsumami::Nodes::new("li", &nav)?
//!     .add_class("menu-item")
//!     .set_attr("data-index", |_: &Element, i: usize| i.to_string());
//!
//! tsumami::events().delegate(&nav, "a", "click", &handler, true)?;
//! ```

mod dom;
mod nodes;
mod utils;

pub use dom::{
    add_class, by_class_name, by_id, closest, data, data_as, dataset, has_class, matches, parents,
    qs, qsa, remove_class, to_array, toggle_class, IntoElements,
};
pub use nodes::Nodes;
pub use utils::{is_numeric, parse_string, to_camel_case, Resolve};

pub use tsumami_css::{SelectorError, SelectorList};
pub use tsumami_dom::{Document, Element, Event, Handler, ParentNode};
pub use tsumami_events::{
    events, DelegateMatch, EventError, EventManager, Registration, Unbind, FORCE_CAPTURE_EVENTS,
};
pub use tsumami_html::{parse, set_inner_html, HtmlError};

/// Toolkit errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Html(#[from] HtmlError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error("cannot deserialize data-{attr}: {source}")]
    Data {
        attr: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
