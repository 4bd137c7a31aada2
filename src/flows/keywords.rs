//! Keyword gathering and the `keywords` command

use anyhow::{bail, Result};
use std::path::Path;
use tracing::debug;

use crate::core::file_reader::FileReadConfig;
use crate::core::model::{ResultItem, ResultSet};
use crate::core::paths::resolve;
use crate::core::render::{RenderConfig, Renderer};
use crate::flows::KeywordSource;
use crate::ingest::keywords::load_keywords;

/// Keywords from the list file followed by the inline ones
pub fn gather_keywords(
    root: &Path,
    source: &KeywordSource,
    config: &FileReadConfig,
) -> Result<Vec<String>> {
    let mut keywords = Vec::new();

    if let Some(file) = &source.file {
        keywords.extend(load_keywords(&resolve(root, file), config)?);
    }
    keywords.extend(
        source
            .inline
            .iter()
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty()),
    );

    if keywords.is_empty() {
        bail!("No keywords given: pass --keywords FILE or -k KEYWORD");
    }

    debug!(count = keywords.len(), "gathered keywords");
    Ok(keywords)
}

/// One keyword item per keyword, without counts
pub fn keyword_items(keywords: &[String]) -> ResultSet {
    keywords
        .iter()
        .map(|keyword| ResultItem::keyword(keyword.as_str(), None))
        .collect()
}

/// Run the keywords command
pub fn run_keywords(
    root: &Path,
    file: &Path,
    config: &FileReadConfig,
    render_config: RenderConfig,
) -> Result<()> {
    let keywords = load_keywords(&resolve(root, file), config)?;
    let result_set = keyword_items(&keywords);

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
