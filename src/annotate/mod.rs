//! Annotate module - The keyword annotation engine
//!
//! Provides:
//! - extract: Text runs of a document in document order
//! - keywords: Keyword normalization and matching priority
//! - matcher: Non-overlapping literal matching within one run
//! - rewrite: Splicing highlight nodes into the tree
//! - counts: Per-keyword occurrence counts
//!
//! The pipeline is extract → match (per run) → rewrite (per run). All
//! occurrences of a run are computed against its original text before the
//! run is rewritten once.

pub mod counts;
pub mod extract;
pub mod keywords;
pub mod matcher;
pub mod rewrite;

use thiserror::Error;
use tracing::debug;

use crate::annotate::counts::CountTable;
use crate::annotate::extract::text_runs;
use crate::annotate::keywords::KeywordSet;
use crate::annotate::matcher::{match_run, Occurrence};
use crate::annotate::rewrite::rewrite_run;
use crate::document::node::{DocumentTree, NodePath};

/// Faults raised by the annotation engine
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// The escaped keyword could not be compiled
    #[error("keyword {keyword:?} cannot be matched literally: {source}")]
    Pattern {
        keyword: String,
        #[source]
        source: regex::Error,
    },

    /// A run's path no longer points at a text node
    #[error("text run at {path} no longer addresses a text node")]
    DetachedRun { path: NodePath },
}

/// Result of annotating one document
#[derive(Debug, Clone)]
pub struct Annotation {
    /// The annotated tree
    pub document: DocumentTree,
    /// Occurrence count per keyword
    pub counts: CountTable,
    /// Number of highlight markers inserted
    pub highlights: usize,
}

/// A run that received at least one occurrence
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub path: NodePath,
    pub occurrences: Vec<Occurrence>,
}

/// Annotates documents against one fixed keyword set
///
/// The keyword priority order and matchers are built once and shared by
/// every document annotated with this instance.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    keywords: KeywordSet,
}

impl Annotator {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, AnnotateError> {
        let keywords = KeywordSet::new(keywords)?;
        debug!(keywords = keywords.len(), "keyword set ready");
        Ok(Self { keywords })
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Match every run of `document` without modifying it
    pub fn plan(&self, document: &DocumentTree) -> (Vec<RunPlan>, CountTable) {
        let mut counts = CountTable::seeded(&self.keywords);
        let mut plans = Vec::new();

        if self.keywords.is_empty() {
            return (plans, counts);
        }

        let mut runs = 0usize;
        for run in text_runs(document) {
            runs += 1;
            let matches = match_run(run.text, &self.keywords);
            if matches.is_empty() {
                continue;
            }
            counts.add_increments(&matches.counts);
            plans.push(RunPlan {
                path: run.path,
                occurrences: matches.occurrences,
            });
        }

        debug!(runs, matched_runs = plans.len(), "matched text runs");
        (plans, counts)
    }

    /// Annotate `document`, returning the rewritten tree and the counts
    pub fn annotate(&self, mut document: DocumentTree) -> Result<Annotation, AnnotateError> {
        let (plans, counts) = self.plan(&document);

        // Later runs first: a splice only shifts the siblings after it
        let mut highlights = 0;
        for plan in plans.iter().rev() {
            highlights += rewrite_run(&mut document, &plan.path, &plan.occurrences, &self.keywords)?;
        }

        debug!(highlights, total = counts.total(), "document annotated");
        Ok(Annotation {
            document,
            counts,
            highlights,
        })
    }
}

/// Annotate `document` with `keywords`
pub fn annotate<S: AsRef<str>>(
    document: DocumentTree,
    keywords: &[S],
) -> Result<Annotation, AnnotateError> {
    Annotator::new(keywords)?.annotate(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::{ElementNode, Node};
    use crate::document::parse::parse_markup;
    use crate::document::serialize::{to_html, HighlightStyle};

    fn doc(html: &str) -> DocumentTree {
        parse_markup(html)
    }

    fn html(annotation: &Annotation) -> String {
        to_html(&annotation.document, &HighlightStyle::default())
    }

    #[test]
    fn test_longest_match_precedence() {
        let result = annotate(doc("<p>category cat</p>"), &["cat", "category"]).unwrap();
        assert_eq!(result.counts.get("cat"), Some(1));
        assert_eq!(result.counts.get("category"), Some(1));
        assert_eq!(
            html(&result),
            r#"<p><span class="highlight">category</span> <span class="highlight">cat</span></p>"#
        );
    }

    #[test]
    fn test_case_insensitive_with_case_preservation() {
        let result = annotate(doc("<p>Cats and CATS</p>"), &["cat"]).unwrap();
        assert_eq!(result.counts.get("cat"), Some(2));
        let out = html(&result);
        assert!(out.contains(r#"<span class="highlight">Cat</span>s"#));
        assert!(out.contains(r#"<span class="highlight">CAT</span>S"#));
    }

    #[test]
    fn test_absent_keyword_leaves_tree_unchanged() {
        let original = doc("<p>hello world</p>");
        let result = annotate(original.clone(), &["xyz"]).unwrap();
        assert_eq!(result.counts.get("xyz"), Some(0));
        assert_eq!(result.highlights, 0);
        assert_eq!(result.document, original);
    }

    #[test]
    fn test_no_match_across_sibling_elements() {
        let result = annotate(doc("<p>ca<b>t</b></p>"), &["cat"]).unwrap();
        assert_eq!(result.counts.get("cat"), Some(0));
        assert_eq!(result.document.highlight_count(), 0);
    }

    #[test]
    fn test_special_character_keywords() {
        let result = annotate(
            doc("<p>I write C++ and Cxx, a.b not aXb</p>"),
            &["C++", "a.b"],
        )
        .unwrap();
        assert_eq!(result.counts.get("C++"), Some(1));
        assert_eq!(result.counts.get("a.b"), Some(1));
    }

    #[test]
    fn test_text_preserved() {
        let source = doc(
            "<h1>Cat facts</h1><p>The category of <i>cats</i> &amp; dogs.</p><ul><li>CAT</li></ul>",
        );
        let before = source.text_content();
        let result = annotate(source, &["cat", "category", "dog", "facts"]).unwrap();
        assert_eq!(result.document.text_content(), before);
        assert_eq!(result.highlights, result.counts.total());
        assert_eq!(result.document.highlight_count(), result.highlights);
    }

    #[test]
    fn test_every_keyword_has_a_key() {
        let result = annotate(doc("<p>cat</p>"), &["cat", "dog", "  ", "cat"]).unwrap();
        assert_eq!(result.counts.len(), 2);
        assert_eq!(result.counts.get("dog"), Some(0));
    }

    #[test]
    fn test_counting_is_idempotent() {
        let source = doc("<p>cat category cat</p><p>Category</p>");
        let keywords = ["cat", "category"];
        let first = annotate(source.clone(), &keywords).unwrap();
        let second = annotate(source, &keywords).unwrap();
        assert_eq!(first.counts, second.counts);
    }

    #[test]
    fn test_empty_keywords() {
        let source = doc("<p>text</p>");
        let empty: [&str; 0] = [];
        let result = annotate(source.clone(), &empty).unwrap();
        assert!(result.counts.is_empty());
        assert_eq!(result.document, source);
    }

    #[test]
    fn test_multiple_runs_in_one_parent_rewritten_correctly() {
        let source = DocumentTree::new(vec![Node::element(
            ElementNode::new("p")
                .with_child(Node::text("cat one "))
                .with_child(Node::element(ElementNode::new("br")))
                .with_child(Node::text("two cat")),
        )]);
        let result = annotate(source, &["cat"]).unwrap();
        assert_eq!(
            html(&result),
            r#"<p><span class="highlight">cat</span> one <br>two <span class="highlight">cat</span></p>"#
        );
    }

    #[test]
    fn test_attributes_never_matched() {
        let result = annotate(doc(r#"<a href="/cat" title="cat">dog</a>"#), &["cat"]).unwrap();
        assert_eq!(result.counts.get("cat"), Some(0));
        assert_eq!(html(&result), r#"<a href="/cat" title="cat">dog</a>"#);
    }

    #[test]
    fn test_reannotating_does_not_nest_highlights() {
        let first = annotate(doc("<p>cat</p>"), &["cat"]).unwrap();
        let second = annotate(first.document.clone(), &["cat"]).unwrap();
        assert_eq!(second.counts.get("cat"), Some(0));
        assert_eq!(second.document, first.document);
    }

    #[test]
    fn test_annotator_reused_across_documents() {
        let annotator = Annotator::new(&["cat"]).unwrap();
        let a = annotator.annotate(doc("<p>cat</p>")).unwrap();
        let b = annotator.annotate(doc("<p>cat cat</p>")).unwrap();
        assert_eq!(a.counts.get("cat"), Some(1));
        assert_eq!(b.counts.get("cat"), Some(2));
    }
}
