//! Text run extraction
//!
//! Walks a DocumentTree depth-first, left to right, and yields every text
//! node that holds something other than whitespace. Attribute values are
//! never visited; highlight markers and raw-text elements such as `<script>`
//! are never descended into.

use crate::document::node::{DocumentTree, Node, NodePath};
use crate::document::parse::is_raw_text_element;

/// A text node reached by the walk, with its position in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun<'a> {
    pub path: NodePath,
    pub text: &'a str,
}

#[derive(Debug, Clone)]
struct Frame<'a> {
    nodes: &'a [Node],
    next: usize,
}

/// Lazy iterator over the text runs of a tree
///
/// A clone continues independently from the same position; calling
/// [`text_runs`] again restarts the walk.
#[derive(Debug, Clone)]
pub struct TextRuns<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> TextRuns<'a> {
    pub fn new(tree: &'a DocumentTree) -> Self {
        Self {
            stack: vec![Frame {
                nodes: &tree.children,
                next: 0,
            }],
        }
    }

    fn current_path(&self) -> NodePath {
        NodePath(self.stack.iter().map(|frame| frame.next - 1).collect())
    }
}

impl<'a> Iterator for TextRuns<'a> {
    type Item = TextRun<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.last_mut() {
            let nodes = frame.nodes;
            let Some(node) = nodes.get(frame.next) else {
                self.stack.pop();
                continue;
            };
            frame.next += 1;

            match node {
                Node::Text(text) if !text.is_blank() => {
                    return Some(TextRun {
                        path: self.current_path(),
                        text: &text.content,
                    });
                }
                Node::Element(element)
                    if !element.children.is_empty() && !is_raw_text_element(&element.tag) =>
                {
                    self.stack.push(Frame {
                        nodes: &element.children,
                        next: 0,
                    });
                }
                _ => {}
            }
        }
        None
    }
}

/// Text runs of `tree` in document order
pub fn text_runs(tree: &DocumentTree) -> TextRuns<'_> {
    TextRuns::new(tree)
}
