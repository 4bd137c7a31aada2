//! kwmark - A keyword highlighter for markup and text documents
//!
//! kwmark provides:
//! - Literal, case-insensitive keyword annotation of markup and text documents
//! - Longest-match precedence with non-overlapping highlights
//! - Per-keyword occurrence counts as tables and clipboard payloads
//! - Unified output format (jsonl/json/md/raw)
//!
//! The engine works on an owned [`DocumentTree`]:
//!
//! ```
//! use kwmark::document::parse::parse_markup;
//! use kwmark::document::serialize::{to_html, HighlightStyle};
//!
//! let tree = parse_markup("<p>category cat</p>");
//! let result = kwmark::annotate(tree, &["cat", "category"]).unwrap();
//! assert_eq!(result.counts.get("cat"), Some(1));
//! assert_eq!(
//!     to_html(&result.document, &HighlightStyle::default()),
//!     r#"<p><span class="highlight">category</span> <span class="highlight">cat</span></p>"#
//! );
//! ```

pub mod annotate;
pub mod cli;
pub mod core;
pub mod document;
pub mod flows;
pub mod ingest;

pub use annotate::counts::CountTable;
pub use annotate::{annotate, AnnotateError, Annotation, Annotator};
pub use document::node::DocumentTree;
