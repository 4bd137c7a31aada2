//! Document ingestion
//!
//! Markup files are parsed into a tree; anything else is read as plain text
//! with one paragraph per blank-line-separated block.

use std::path::Path;
use tracing::debug;

use crate::core::file_reader::{read_file_with_config, FileReadConfig};
use crate::core::model::Meta;
use crate::core::paths::normalize_path;
use crate::document::node::DocumentTree;
use crate::document::parse::parse_markup;
use crate::ingest::IngestError;

const MARKUP_EXTENSIONS: &[&str] = &["html", "htm", "xhtml", "xml"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown"];

/// How a source file is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Markup,
    PlainText,
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

impl SourceKind {
    pub fn for_path(path: &Path) -> Self {
        match extension(path) {
            Some(ext) if MARKUP_EXTENSIONS.contains(&ext.as_str()) => SourceKind::Markup,
            _ => SourceKind::PlainText,
        }
    }
}

/// Whether a directory walk should pick this file up as a document
pub fn is_document_path(path: &Path) -> bool {
    extension(path)
        .map(|ext| MARKUP_EXTENSIONS.contains(&ext.as_str()) || TEXT_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// A document ready for annotation
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub tree: DocumentTree,
    pub kind: SourceKind,
    /// Size, hash and truncation of the source file
    pub meta: Meta,
}

/// Build a tree from already-read source text
pub fn parse_source(content: &str, kind: SourceKind) -> DocumentTree {
    match kind {
        SourceKind::Markup => parse_markup(content),
        SourceKind::PlainText => DocumentTree::from_plain_text(content),
    }
}

/// Load and parse the document at `path`
pub fn load_document(path: &Path, config: &FileReadConfig) -> Result<LoadedDocument, IngestError> {
    let shown = normalize_path(path);
    let read = read_file_with_config(path, config);

    let Some(content) = read.content.as_deref() else {
        return Err(IngestError::unreadable(&shown, read.skip_warning()));
    };

    let kind = SourceKind::for_path(path);
    let tree = parse_source(content, kind);

    debug!(path = %shown, ?kind, nodes = tree.children.len(), "loaded document");
    Ok(LoadedDocument {
        tree,
        kind,
        meta: read.meta(),
    })
}
