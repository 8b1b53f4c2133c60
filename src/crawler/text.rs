//! Markup to plain text conversion
//!
//! Detail pages are parsed from their plain-text rendering, where each labelled
//! field ends at a line break. Block-level elements and `<br>` therefore end a
//! line; inline markup is dropped without adding whitespace.

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Converts an HTML document into plain text
pub trait TextNormalizer: Send + Sync {
    fn strip_markup(&self, html: &str) -> String;
}

/// [`TextNormalizer`] built on the `scraper` DOM
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlStripper;

impl TextNormalizer for HtmlStripper {
    fn strip_markup(&self, html: &str) -> String {
        strip_markup(html)
    }
}

/// Elements whose content never reaches the text rendering
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements followed by a line break
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "footer", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section",
    "table", "td", "th", "title", "tr", "ul",
];

/// Strips tags from `html`, keeping text content and decoding entities
pub fn strip_markup(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::with_capacity(html.len() / 2);
    append_text(document.root_element(), &mut text);
    text
}

fn append_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    append_text(child_element, out);
                }
                if BLOCK_ELEMENTS.contains(&name) && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}
