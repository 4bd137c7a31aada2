//! Batch flow - Annotate many documents with one keyword set
//!
//! Directories are expanded with an ignore-aware walk. Documents are
//! independent, so they are annotated in parallel when the `parallel`
//! feature is enabled. A document that cannot be loaded becomes an error
//! item and does not stop the run.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::annotate::counts::CountTable;
use crate::annotate::Annotator;
use crate::core::file_reader::FileReadConfig;
use crate::core::model::{KwError, ResultItem, ResultSet};
use crate::core::paths::{display_path, resolve};
use crate::core::render::{RenderConfig, Renderer};
use crate::document::serialize::HighlightStyle;
use crate::flows::annotate::{annotate_file, AnnotatedFile};
use crate::flows::report::count_items;
use crate::flows::{build_annotator, KeywordSource};
use crate::ingest::document::is_document_path;
use crate::ingest::IngestError;

/// Options of the batch command
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Where annotated copies are written
    pub out_dir: Option<PathBuf>,
    /// Include hidden files and directories
    pub hidden: bool,
    /// Respect .gitignore and other ignore files
    pub ignore: bool,
}

/// Expand `paths` into a sorted, deduplicated list of document files
///
/// Files named explicitly are kept whatever their extension; directories
/// contribute only files with a markup or text extension.
pub fn collect_documents(root: &Path, paths: &[PathBuf], options: &BatchOptions) -> Vec<PathBuf> {
    let mut documents = Vec::new();

    for path in paths {
        let path = resolve(root, path);
        if !path.is_dir() {
            documents.push(path);
            continue;
        }

        let mut builder = WalkBuilder::new(&path);
        builder
            .hidden(!options.hidden)
            .ignore(options.ignore)
            .git_ignore(options.ignore)
            .git_global(options.ignore)
            .git_exclude(options.ignore);

        for entry in builder.build() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    debug!(%err, "skipping unreadable entry");
                    continue;
                }
            };
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file && is_document_path(entry.path()) {
                documents.push(entry.into_path());
            }
        }
    }

    documents.sort();
    documents.dedup();
    documents
}

/// Output location of the annotated copy of `path`
///
/// The copy keeps the full source file name, so `a.html` and `a.txt` never
/// share an output. Files under `root` mirror their relative location; files
/// elsewhere mirror their absolute location.
pub fn output_path(out_dir: &Path, root: &Path, path: &Path) -> PathBuf {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<&OsStr> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    let Some((name, parents)) = parts.split_last() else {
        return out_dir.join("document.highlighted.html");
    };

    let mut target = out_dir.to_path_buf();
    for parent in parents {
        target.push(parent);
    }
    let mut file_name = name.to_os_string();
    file_name.push(".highlighted.html");
    target.push(file_name);
    target
}

fn error_item(err: &anyhow::Error, display: &str) -> ResultItem {
    let mut item = match err.downcast_ref::<IngestError>() {
        Some(ingest) => ingest.to_result_item(),
        None => ResultItem::error(KwError::new("ANNOTATE_FAILED", format!("{:#}", err))),
    };
    item.path = Some(display.to_string());
    item
}

fn write_output(annotated: &AnnotatedFile, out_dir: &Path, root: &Path, path: &Path) -> Result<PathBuf> {
    let target = output_path(out_dir, root, path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&target, &annotated.html)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(target)
}

/// Annotate one file into its document item, or an error item
fn process_file(
    annotator: &Annotator,
    root: &Path,
    path: &Path,
    style: &HighlightStyle,
    config: &FileReadConfig,
    out_dir: Option<&Path>,
) -> (ResultItem, Option<CountTable>) {
    let display = display_path(path, root);

    let annotated = match annotate_file(annotator, path, style, config) {
        Ok(annotated) => annotated,
        Err(err) => return (error_item(&err, &display), None),
    };

    let mut data = serde_json::json!({ "counts": &annotated.counts });
    if let Some(out_dir) = out_dir {
        match write_output(&annotated, out_dir, root, path) {
            Ok(target) => data["output"] = serde_json::json!(display_path(&target, root)),
            Err(err) => return (error_item(&err, &display), None),
        }
    }

    let item = ResultItem::document(display)
        .with_meta(annotated.meta)
        .with_data(data);
    (item, Some(annotated.counts))
}

/// Annotate every document and sum the counts
pub fn batch_annotate(
    annotator: &Annotator,
    root: &Path,
    documents: &[PathBuf],
    style: &HighlightStyle,
    config: &FileReadConfig,
    out_dir: Option<&Path>,
) -> (Vec<ResultItem>, CountTable) {
    #[cfg(feature = "parallel")]
    let processed: Vec<(ResultItem, Option<CountTable>)> = documents
        .par_iter()
        .map(|path| process_file(annotator, root, path, style, config, out_dir))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let processed: Vec<(ResultItem, Option<CountTable>)> = documents
        .iter()
        .map(|path| process_file(annotator, root, path, style, config, out_dir))
        .collect();

    let mut totals = CountTable::seeded(annotator.keywords());
    let mut items = Vec::with_capacity(processed.len());
    for (item, counts) in processed {
        if let Some(counts) = counts {
            totals.merge(&counts);
        }
        items.push(item);
    }
    (items, totals)
}

/// Run the batch command
pub fn run_batch(
    root: &Path,
    paths: &[PathBuf],
    source: &KeywordSource,
    options: &BatchOptions,
    style: &HighlightStyle,
    config: &FileReadConfig,
    render_config: RenderConfig,
) -> Result<()> {
    let annotator = build_annotator(root, source, config)?;
    let documents = collect_documents(root, paths, options);
    let out_dir = options.out_dir.as_ref().map(|dir| resolve(root, dir));

    info!(documents = documents.len(), "annotating documents");
    let (items, totals) = batch_annotate(
        &annotator,
        root,
        &documents,
        style,
        config,
        out_dir.as_deref(),
    );

    let mut result_set = ResultSet::new();
    result_set.extend(items);
    result_set.extend(count_items(&totals));

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Kind;
    use tempfile::tempdir;

    fn write(root: &Path, name: &str, content: &str) {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_collect_documents_filters_directories() {
        let temp = tempdir().unwrap();
        write(temp.path(), "docs/a.html", "<p>cat</p>");
        write(temp.path(), "docs/b.txt", "cat");
        write(temp.path(), "docs/c.png", "x");
        write(temp.path(), "docs/.hidden.html", "<p>cat</p>");

        let documents = collect_documents(
            temp.path(),
            &[PathBuf::from("docs")],
            &BatchOptions::default(),
        );
        let names: Vec<String> = documents
            .iter()
            .map(|p| display_path(p, temp.path()))
            .collect();
        assert_eq!(names, vec!["docs/a.html", "docs/b.txt"]);
    }

    #[test]
    fn test_collect_documents_hidden_and_explicit() {
        let temp = tempdir().unwrap();
        write(temp.path(), "docs/.hidden.html", "<p>cat</p>");
        write(temp.path(), "notes.data", "cat");

        let options = BatchOptions {
            hidden: true,
            ..Default::default()
        };
        let documents = collect_documents(
            temp.path(),
            &[PathBuf::from("docs"), PathBuf::from("notes.data")],
            &options,
        );
        assert_eq!(documents.len(), 2);
    }

    #[test]
    fn test_output_path() {
        let root = Path::new("/project");
        assert_eq!(
            output_path(Path::new("/out"), root, Path::new("/project/docs/a.html")),
            PathBuf::from("/out/docs/a.html.highlighted.html")
        );
        assert_eq!(
            output_path(Path::new("/out"), root, Path::new("/elsewhere/b.txt")),
            PathBuf::from("/out/elsewhere/b.txt.highlighted.html")
        );
    }

    #[test]
    fn test_output_path_distinct_per_source() {
        let root = Path::new("/project");
        let out = Path::new("/out");
        let a = output_path(out, root, Path::new("/project/docs/a.html"));
        let b = output_path(out, root, Path::new("/project/docs/a.txt"));
        assert_ne!(a, b);

        let c = output_path(out, root, Path::new("/one/a.html"));
        let d = output_path(out, root, Path::new("/two/a.html"));
        assert_ne!(c, d);
    }

    #[test]
    fn test_batch_annotate_same_stem_outputs_do_not_collide() {
        let temp = tempdir().unwrap();
        write(temp.path(), "docs/a.html", "<p>cat</p>");
        write(temp.path(), "docs/a.txt", "dog");
        let out_dir = temp.path().join("out");

        let annotator = Annotator::new(&["cat", "dog"]).unwrap();
        let (items, _) = batch_annotate(
            &annotator,
            temp.path(),
            &[temp.path().join("docs/a.html"), temp.path().join("docs/a.txt")],
            &HighlightStyle::default(),
            &FileReadConfig::default(),
            Some(&out_dir),
        );

        let outputs: Vec<&str> = items
            .iter()
            .map(|item| item.data.as_ref().unwrap()["output"].as_str().unwrap())
            .collect();
        assert_eq!(
            outputs,
            vec![
                "out/docs/a.html.highlighted.html",
                "out/docs/a.txt.highlighted.html"
            ]
        );
        let html = fs::read_to_string(out_dir.join("docs/a.html.highlighted.html")).unwrap();
        let text = fs::read_to_string(out_dir.join("docs/a.txt.highlighted.html")).unwrap();
        assert!(html.contains(">cat</span>"));
        assert!(text.contains(">dog</span>"));
    }

    #[test]
    fn test_batch_annotate_sums_counts_and_reports_errors() {
        let temp = tempdir().unwrap();
        write(temp.path(), "a.html", "<p>cat and dog</p>");
        write(temp.path(), "b.txt", "Cat\n\ncat");

        let annotator = Annotator::new(&["cat", "dog", "bird"]).unwrap();
        let documents = vec![
            temp.path().join("a.html"),
            temp.path().join("b.txt"),
            temp.path().join("missing.html"),
        ];
        let (items, totals) = batch_annotate(
            &annotator,
            temp.path(),
            &documents,
            &HighlightStyle::default(),
            &FileReadConfig::default(),
            None,
        );

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].kind, Kind::Document);
        assert_eq!(items[0].data.as_ref().unwrap()["counts"][0]["count"], 1);
        assert_eq!(items[1].meta.highlights, Some(2));
        assert_eq!(items[2].kind, Kind::Error);
        assert_eq!(items[2].path.as_deref(), Some("missing.html"));
        assert_eq!(items[2].errors[0].code, "READ_FAILED");

        assert_eq!(totals.get("cat"), Some(3));
        assert_eq!(totals.get("dog"), Some(1));
        assert_eq!(totals.get("bird"), Some(0));
    }

    #[test]
    fn test_batch_annotate_writes_outputs() {
        let temp = tempdir().unwrap();
        write(temp.path(), "docs/a.html", "<p>cat</p>");
        let out_dir = temp.path().join("out");

        let annotator = Annotator::new(&["cat"]).unwrap();
        let (items, _) = batch_annotate(
            &annotator,
            temp.path(),
            &[temp.path().join("docs/a.html")],
            &HighlightStyle::default(),
            &FileReadConfig::default(),
            Some(&out_dir),
        );

        assert_eq!(
            items[0].data.as_ref().unwrap()["output"],
            "out/docs/a.html.highlighted.html"
        );
        let written = fs::read_to_string(out_dir.join("docs/a.html.highlighted.html")).unwrap();
        assert_eq!(written, "<p><span class=\"highlight\">cat</span></p>");
    }
}
