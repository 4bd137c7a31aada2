//! Markup ingestion
//!
//! Turns HTML into a DocumentTree using the HTML5 parsing algorithm, so
//! documents are read the way a browser reads them: stray end tags are
//! ignored, unclosed elements are closed, every named character reference is
//! resolved, a bare `<` stays text and `<script>`/`<style>` content is raw
//! text. Comments, doctypes and processing instructions are dropped. Only
//! the content of `<body>` is kept.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, Attribute, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::debug;

use crate::document::node::{DocumentTree, ElementNode, Node};

/// Elements that never have content or an end tag
pub static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// Elements whose content is raw text: never escaped, never annotated
pub static RAW_TEXT_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
    ]
    .into_iter()
    .collect()
});

/// Check whether a tag name is an HTML void element
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(tag.to_ascii_lowercase().as_str())
}

/// Check whether a tag name holds raw text
pub fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(tag.to_ascii_lowercase().as_str())
}

/// Parse markup into a DocumentTree
///
/// HTML parsing never fails: any input yields a tree.
pub fn parse_markup(input: &str) -> DocumentTree {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(input);

    let children = match find_body(&dom.document) {
        Some(body) => {
            debug!("keeping <body> content only");
            convert_children(&body)
        }
        None => convert_children(&dom.document),
    };

    DocumentTree::new(children)
}

/// Depth-first search for the first `<body>` element
fn find_body(handle: &Handle) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if let NodeData::Element { name, .. } = &child.data {
            if &*name.local == "body" {
                return Some(child.clone());
            }
            if let Some(body) = find_body(child) {
                return Some(body);
            }
        }
    }
    None
}

fn convert_children(handle: &Handle) -> Vec<Node> {
    let mut nodes = Vec::new();

    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => push_text(&mut nodes, &contents.borrow()),
            NodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let mut element = ElementNode::new(name.local.to_string());
                element.attributes = attrs.borrow().iter().map(attribute).collect();
                element.children = match template_contents.borrow().as_ref() {
                    Some(contents) => convert_children(contents),
                    None => convert_children(child),
                };
                nodes.push(Node::Element(element));
            }
            _ => {}
        }
    }

    nodes
}

fn attribute(attr: &Attribute) -> (String, String) {
    let name = match &attr.name.prefix {
        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
        None => attr.name.local.to_string(),
    };
    (name, attr.value.to_string())
}

/// Append text, merging it into a preceding text node
fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(previous)) = nodes.last_mut() {
        previous.content.push_str(text);
        return;
    }
    nodes.push(Node::text(text));
}
