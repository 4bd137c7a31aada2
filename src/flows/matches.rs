//! Matches flow - Every accepted occurrence of a document, without rewriting

use anyhow::Result;
use std::path::Path;

use crate::annotate::Annotator;
use crate::core::file_reader::FileReadConfig;
use crate::core::model::{RangeByte, ResultItem, ResultSet};
use crate::core::paths::{display_path, resolve};
use crate::core::render::{RenderConfig, Renderer};
use crate::document::node::{DocumentTree, Node};
use crate::flows::{build_annotator, KeywordSource};
use crate::ingest::document::load_document;

/// One match item per occurrence, in document order
///
/// Ranges are byte offsets into the text run named by `data.run`.
pub fn collect_matches(annotator: &Annotator, tree: &DocumentTree, path: &str) -> Vec<ResultItem> {
    let (plans, _) = annotator.plan(tree);
    let keywords = annotator.keywords();

    let mut items = Vec::new();
    for plan in &plans {
        let Some(Node::Text(run)) = tree.node_at(&plan.path.0) else {
            continue;
        };
        let run_path = plan.path.to_string();

        for occurrence in &plan.occurrences {
            let Some(keyword) = keywords.get(occurrence.keyword) else {
                continue;
            };
            let text = &run.content[occurrence.start..occurrence.end];
            items.push(
                ResultItem::match_result(
                    path,
                    keyword.as_str(),
                    RangeByte::new(occurrence.start, occurrence.end),
                    text,
                )
                .with_data(serde_json::json!({
                    "keyword": keyword.as_str(),
                    "run": run_path,
                })),
            );
        }
    }
    items
}

/// Run the matches command
pub fn run_matches(
    root: &Path,
    doc: &Path,
    source: &KeywordSource,
    config: &FileReadConfig,
    render_config: RenderConfig,
) -> Result<()> {
    let annotator = build_annotator(root, source, config)?;
    let path = resolve(root, doc);
    let loaded = load_document(&path, config)?;

    let result_set: ResultSet =
        collect_matches(&annotator, &loaded.tree, &display_path(&path, root))
            .into_iter()
            .collect();

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
