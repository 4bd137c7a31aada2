//! Keyword list ingestion
//!
//! Reads the first column of a tabular file. Cells are trimmed, empty cells
//! are skipped and the literal header labels `keyword` / `keywords` (any
//! case) are dropped. Duplicates are kept; the engine collapses them.

use std::path::Path;
use tracing::debug;

use crate::core::file_reader::{read_file_with_config, FileReadConfig};
use crate::core::paths::normalize_path;
use crate::ingest::IngestError;

/// Column delimiter of a keyword list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
    /// One keyword per line
    Line,
}

impl Delimiter {
    /// Pick the delimiter from the file extension
    pub fn for_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Delimiter::Comma,
            Some("tsv") | Some("tab") => Delimiter::Tab,
            _ => Delimiter::Line,
        }
    }

    fn as_char(self) -> Option<char> {
        match self {
            Delimiter::Comma => Some(','),
            Delimiter::Tab => Some('\t'),
            Delimiter::Line => None,
        }
    }
}

/// First cell of a row, unquoting a double-quoted cell
fn first_cell(line: &str, delimiter: Delimiter) -> String {
    let Some(separator) = delimiter.as_char() else {
        return line.to_string();
    };

    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix('"') {
        let mut cell = String::new();
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    return cell;
                }
            } else {
                cell.push(c);
            }
        }
        return cell;
    }

    line.split(separator).next().unwrap_or_default().to_string()
}

fn is_header_label(cell: &str) -> bool {
    cell.eq_ignore_ascii_case("keyword") || cell.eq_ignore_ascii_case("keywords")
}

/// Extract keywords from the text of a keyword list
pub fn parse_keyword_list(content: &str, delimiter: Delimiter) -> Vec<String> {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .map(|line| first_cell(line, delimiter))
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty() && !is_header_label(cell))
        .collect()
}

/// Load the keyword list at `path`
pub fn load_keywords(path: &Path, config: &FileReadConfig) -> Result<Vec<String>, IngestError> {
    let shown = normalize_path(path);
    let read = read_file_with_config(path, config);

    let Some(content) = read.content.as_deref() else {
        return Err(IngestError::unreadable(&shown, read.skip_warning()));
    };

    let keywords = parse_keyword_list(content, Delimiter::for_path(path));
    if keywords.is_empty() {
        return Err(IngestError::NoKeywords { path: shown });
    }

    debug!(path = %shown, count = keywords.len(), "loaded keywords");
    Ok(keywords)
}
