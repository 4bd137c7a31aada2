//! Flows module - The commands built on top of the engine
//!
//! Provides:
//! - annotate: Highlight one document and report its counts
//! - matches: List every accepted occurrence without rewriting
//! - report: Count tables, clipboard payloads and the `counts` command
//! - keywords: Keyword gathering and the `keywords` command
//! - batch: Annotate many documents in parallel

pub mod annotate;
pub mod batch;
pub mod keywords;
pub mod matches;
pub mod report;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::annotate::Annotator;
use crate::core::file_reader::FileReadConfig;

/// Where the keywords of a command come from
#[derive(Debug, Clone, Default)]
pub struct KeywordSource {
    /// Keyword list file (first column)
    pub file: Option<PathBuf>,
    /// Keywords given on the command line
    pub inline: Vec<String>,
}

/// Gather keywords from `source` and compile them once
pub fn build_annotator(
    root: &Path,
    source: &KeywordSource,
    config: &FileReadConfig,
) -> Result<Annotator> {
    let keywords = keywords::gather_keywords(root, source, config)?;
    Annotator::new(&keywords).context("Failed to prepare keywords")
}
