//! Annotate flow - Highlight one document and report its keyword counts

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::annotate::counts::CountTable;
use crate::annotate::Annotator;
use crate::core::file_reader::FileReadConfig;
use crate::core::model::{Meta, ResultItem, ResultSet};
use crate::core::paths::{display_path, resolve};
use crate::core::render::{RenderConfig, Renderer};
use crate::document::serialize::{to_html, HighlightStyle};
use crate::flows::report::count_items;
use crate::flows::{build_annotator, KeywordSource};
use crate::ingest::document::load_document;

/// One document after annotation
#[derive(Debug, Clone)]
pub struct AnnotatedFile {
    /// Serialized annotated markup
    pub html: String,
    pub counts: CountTable,
    /// Source size and hash, plus the number of highlights inserted
    pub meta: Meta,
}

/// Load, annotate and serialize the document at `path`
///
/// Load failures surface as [`crate::ingest::IngestError`] so callers can
/// turn them into error items.
pub fn annotate_file(
    annotator: &Annotator,
    path: &Path,
    style: &HighlightStyle,
    config: &FileReadConfig,
) -> Result<AnnotatedFile> {
    let loaded = load_document(path, config)?;
    let annotation = annotator
        .annotate(loaded.tree)
        .with_context(|| format!("Failed to annotate {}", path.display()))?;

    Ok(AnnotatedFile {
        html: to_html(&annotation.document, style),
        counts: annotation.counts,
        meta: Meta {
            highlights: Some(annotation.highlights),
            ..loaded.meta
        },
    })
}

/// Run the annotate command
pub fn run_annotate(
    root: &Path,
    doc: &Path,
    source: &KeywordSource,
    output: Option<&Path>,
    style: &HighlightStyle,
    config: &FileReadConfig,
    render_config: RenderConfig,
) -> Result<()> {
    let annotator = build_annotator(root, source, config)?;
    let path = resolve(root, doc);
    let annotated = annotate_file(&annotator, &path, style, config)?;

    let mut item = ResultItem::document(display_path(&path, root)).with_meta(annotated.meta);
    match output {
        Some(output) => {
            let output_path = resolve(root, output);
            fs::write(&output_path, &annotated.html)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            info!(path = %output_path.display(), "wrote annotated document");
            item = item.with_data(serde_json::json!({
                "output": display_path(&output_path, root),
            }));
        }
        None => item = item.with_excerpt(annotated.html),
    }

    let mut result_set = ResultSet::new();
    result_set.push(item);
    result_set.extend(count_items(&annotated.counts));

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::IngestError;
    use tempfile::tempdir;

    #[test]
    fn test_annotate_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("doc.html");
        fs::write(&path, "<body><p>Cats and a category of cat</p></body>").unwrap();

        let annotator = Annotator::new(&["cat", "category"]).unwrap();
        let annotated = annotate_file(
            &annotator,
            &path,
            &HighlightStyle::default(),
            &FileReadConfig::default(),
        )
        .unwrap();

        assert_eq!(
            annotated.html,
            "<p><span class=\"highlight\">Cat</span>s and a \
             <span class=\"highlight\">category</span> of \
             <span class=\"highlight\">cat</span></p>"
        );
        assert_eq!(annotated.counts.get("cat"), Some(2));
        assert_eq!(annotated.counts.get("category"), Some(1));
        assert_eq!(annotated.meta.highlights, Some(3));
        assert!(annotated.meta.hash.is_some());
    }

    #[test]
    fn test_annotate_file_custom_style() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "a < cat").unwrap();

        let annotator = Annotator::new(&["cat"]).unwrap();
        let annotated = annotate_file(
            &annotator,
            &path,
            &HighlightStyle::new("mark", "kw"),
            &FileReadConfig::default(),
        )
        .unwrap();
        assert_eq!(annotated.html, "<p>a &lt; <mark class=\"kw\">cat</mark></p>");
    }

    #[test]
    fn test_annotate_file_load_error_is_ingest_error() {
        let annotator = Annotator::new(&["cat"]).unwrap();
        let err = annotate_file(
            &annotator,
            Path::new("/nonexistent/doc.html"),
            &HighlightStyle::default(),
            &FileReadConfig::default(),
        )
        .unwrap_err();
        let ingest = err.downcast_ref::<IngestError>().unwrap();
        assert_eq!(ingest.code(), "READ_FAILED");
    }
}
