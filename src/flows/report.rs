//! Count reports - ranked tables, clipboard payloads and the `counts` command
//!
//! Every view ranks keywords by descending count with ties in input order.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::annotate::counts::CountTable;
use crate::core::file_reader::FileReadConfig;
use crate::core::model::ResultItem;
use crate::core::paths::resolve;
use crate::document::serialize::escape_text;
use crate::flows::{build_annotator, KeywordSource};
use crate::ingest::document::load_document;

/// Output of the `counts` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountsFormat {
    /// Tab-separated rows with a header
    Tsv,
    /// An HTML table
    Html,
    /// Both of the above as one JSON clipboard payload
    #[default]
    Clipboard,
    /// A colored terminal table
    Table,
}

impl std::str::FromStr for CountsFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(CountsFormat::Tsv),
            "html" => Ok(CountsFormat::Html),
            "clipboard" => Ok(CountsFormat::Clipboard),
            "table" => Ok(CountsFormat::Table),
            _ => Err(format!("Unknown counts format: {}", s)),
        }
    }
}

/// A two-column count table in the two flavours a clipboard offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipboardPayload {
    #[serde(rename = "text/plain")]
    pub plain: String,
    #[serde(rename = "text/html")]
    pub html: String,
}

impl ClipboardPayload {
    pub fn from_counts(counts: &CountTable) -> Self {
        Self {
            plain: counts_tsv(counts),
            html: counts_html(counts),
        }
    }
}

/// Tab-separated `Keyword\tCount` rows
pub fn counts_tsv(counts: &CountTable) -> String {
    let mut output = String::from("Keyword\tCount\n");
    for entry in counts.ranked() {
        // Tabs and newlines would break the row structure
        let keyword = entry.keyword.replace(['\t', '\n', '\r'], " ");
        output.push_str(&format!("{}\t{}\n", keyword, entry.count));
    }
    output
}

/// An HTML table; keywords without occurrences carry class `no-match`
pub fn counts_html(counts: &CountTable) -> String {
    let mut output = String::from("<table>\n<tr><th>Keyword</th><th>Count</th></tr>\n");
    for entry in counts.ranked() {
        let row = if entry.count == 0 {
            "<tr class=\"no-match\">"
        } else {
            "<tr>"
        };
        output.push_str(&format!(
            "{}<td>{}</td><td>{}</td></tr>\n",
            row,
            escape_text(&entry.keyword),
            entry.count
        ));
    }
    output.push_str("</table>");
    output
}

/// A padded terminal table with unmatched keywords dimmed
pub fn counts_table(counts: &CountTable) -> String {
    let width = counts
        .iter()
        .map(|entry| entry.keyword.chars().count())
        .chain(std::iter::once("Keyword".len()))
        .max()
        .unwrap_or_default();

    let mut output = format!("{}  {}\n", pad("Keyword", width).bold(), "Count".bold());
    for entry in counts.ranked() {
        let keyword = pad(&entry.keyword, width);
        if entry.count == 0 {
            let line = format!("{}  {:>5}", keyword, entry.count);
            output.push_str(&line.dimmed().to_string());
        } else {
            output.push_str(&format!("{}  {:>5}", keyword, entry.count.to_string().green()));
        }
        output.push('\n');
    }
    output.push_str(&format!(
        "{}  {:>5}",
        pad("Total", width).bold(),
        counts.total()
    ));
    output
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

/// One keyword item with its count per entry, ranked
pub fn count_items(counts: &CountTable) -> Vec<ResultItem> {
    counts
        .ranked()
        .into_iter()
        .map(|entry| ResultItem::keyword(entry.keyword.as_str(), Some(entry.count)))
        .collect()
}

/// Render `counts` in the requested format
pub fn render_counts(counts: &CountTable, format: CountsFormat) -> String {
    match format {
        CountsFormat::Tsv => counts_tsv(counts).trim_end().to_string(),
        CountsFormat::Html => counts_html(counts),
        CountsFormat::Clipboard => serde_json::to_string(&ClipboardPayload::from_counts(counts))
            .unwrap_or_else(|_| "{}".to_string()),
        CountsFormat::Table => counts_table(counts),
    }
}

/// Run the counts command
pub fn run_counts(
    root: &Path,
    doc: &Path,
    source: &KeywordSource,
    format: CountsFormat,
    config: &FileReadConfig,
) -> Result<()> {
    let annotator = build_annotator(root, source, config)?;
    let loaded = load_document(&resolve(root, doc), config)?;
    let (_, counts) = annotator.plan(&loaded.tree);

    println!("{}", render_counts(&counts, format));

    Ok(())
}
