//! Document tree model
//!
//! A DocumentTree owns an ordered list of nodes (the content of the document
//! body). Text relevant to matching lives only in `Text` leaves; element
//! attributes are never part of the text content.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of the document tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Text(TextNode),
    Element(ElementNode),
    Highlight(HighlightNode),
}

/// Leaf holding literal text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub content: String,
}

impl TextNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// True when the run holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Internal node with a tag, ordered attributes and ordered children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Marker wrapped around one matched occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightNode {
    /// The keyword (as supplied) this occurrence was matched for
    pub keyword: String,
    /// The matched text, in the document's original casing
    pub text: String,
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(TextNode::new(content))
    }

    pub fn element(element: ElementNode) -> Self {
        Node::Element(element)
    }

    pub fn highlight(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Node::Highlight(HighlightNode {
            keyword: keyword.into(),
            text: text.into(),
        })
    }

    fn push_text_content(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&text.content),
            Node::Highlight(highlight) => out.push_str(&highlight.text),
            Node::Element(element) => {
                for child in &element.children {
                    child.push_text_content(out);
                }
            }
        }
    }

    fn count_highlights(&self) -> usize {
        match self {
            Node::Highlight(_) => 1,
            Node::Text(_) => 0,
            Node::Element(element) => element.children.iter().map(Node::count_highlights).sum(),
        }
    }
}

/// Child-index path from the tree root to one node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    /// Index of the node within its parent's children
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the parent, or an empty path for top-level nodes
    pub fn parent(&self) -> &[usize] {
        match self.0.split_last() {
            Some((_, parent)) => parent,
            None => &[],
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "/{}", parts.join("/"))
    }
}

/// An ordered, rooted tree of nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTree {
    pub children: Vec<Node>,
}

impl DocumentTree {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Build a tree from plain text: one `<p>` per blank-line-separated paragraph
    ///
    /// CRLF line endings are read as LF.
    pub fn from_plain_text(text: &str) -> Self {
        let text = text.replace("\r\n", "\n");
        let children = text
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .map(|paragraph| {
                Node::element(ElementNode::new("p").with_child(Node::text(paragraph)))
            })
            .collect();
        Self { children }
    }

    /// Concatenated text of every text and highlight node, in document order
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_text_content(&mut out);
        }
        out
    }

    /// Number of highlight markers anywhere in the tree
    pub fn highlight_count(&self) -> usize {
        self.children.iter().map(Node::count_highlights).sum()
    }

    /// Resolve a node by path
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get(*first)?;
        for index in rest {
            match node {
                Node::Element(element) => node = element.children.get(*index)?,
                _ => return None,
            }
        }
        Some(node)
    }

    /// Mutable access to the child list addressed by `path`
    ///
    /// An empty path addresses the root's children; any other path must end
    /// at an element.
    pub fn children_at_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        let mut children = &mut self.children;
        for index in path {
            match children.get_mut(*index)? {
                Node::Element(element) => children = &mut element.children,
                _ => return None,
            }
        }
        Some(children)
    }
}
