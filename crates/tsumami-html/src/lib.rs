//! Tsumami HTML Parser
//!
//! HTML5 parsing built on html5ever. Produces `tsumami-dom` documents and
//! fills elements from markup.

mod parser;

pub use parser::HtmlParser;

use tsumami_dom::{Document, DomError, Element};

/// Parse an HTML string into a new document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Replace the children of `element` with the nodes parsed from `html`
pub fn set_inner_html(element: &Element, html: &str) -> Result<(), HtmlError> {
    HtmlParser::new().set_inner_html(element, html)
}

/// HTML parsing errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build DOM: {0}")]
    Dom(#[from] DomError),
}
