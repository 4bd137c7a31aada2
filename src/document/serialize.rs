//! HTML serialization of a DocumentTree

use serde::{Deserialize, Serialize};

use crate::document::node::{DocumentTree, ElementNode, Node};
use crate::document::parse::{is_raw_text_element, is_void_element};

/// Default tag wrapped around highlighted occurrences
pub const DEFAULT_HIGHLIGHT_TAG: &str = "span";

/// Default class carried by highlight wrappers
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "highlight";

/// How highlight markers are written out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightStyle {
    pub tag: String,
    pub class: String,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            tag: DEFAULT_HIGHLIGHT_TAG.to_string(),
            class: DEFAULT_HIGHLIGHT_CLASS.to_string(),
        }
    }
}

impl HighlightStyle {
    pub fn new(tag: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: class.into(),
        }
    }
}

/// Escape text content
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a double-quoted attribute value
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

/// Serialize the whole tree to HTML
pub fn to_html(tree: &DocumentTree, style: &HighlightStyle) -> String {
    let mut out = String::new();
    for node in &tree.children {
        write_node(&mut out, node, style);
    }
    out
}

fn write_node(out: &mut String, node: &Node, style: &HighlightStyle) {
    match node {
        Node::Text(text) => out.push_str(&escape_text(&text.content)),
        Node::Highlight(highlight) => {
            out.push_str(&format!(
                "<{} class=\"{}\">{}</{}>",
                style.tag,
                escape_attr(&style.class),
                escape_text(&highlight.text),
                style.tag
            ));
        }
        Node::Element(element) => write_element(out, element, style),
    }
}

fn write_element(out: &mut String, element: &ElementNode, style: &HighlightStyle) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attributes {
        out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
    }
    out.push('>');

    if element.children.is_empty() && is_void_element(&element.tag) {
        return;
    }

    if is_raw_text_element(&element.tag) {
        for child in &element.children {
            if let Node::Text(text) = child {
                out.push_str(&text.content);
            }
        }
    } else {
        for child in &element.children {
            write_node(out, child, style);
        }
    }
    out.push_str(&format!("</{}>", element.tag));
}
