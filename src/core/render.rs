//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with default options
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut documents = Vec::new();
        let mut keywords = Vec::new();
        let mut matches = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Document => documents.push(item),
                Kind::Keyword => keywords.push(item),
                Kind::Match => matches.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    match &item.path {
                        Some(path) => output.push_str(&format!(
                            "- **{}** `{}`: {}\n",
                            error.code, path, error.message
                        )),
                        None => output.push_str(&format!("- **{}**: {}\n", error.code, error.message)),
                    }
                }
            }
            output.push('\n');
        }

        if !documents.is_empty() {
            output.push_str("## Documents\n\n");
            for item in documents {
                self.render_document_md(&mut output, item);
            }
        }

        if !keywords.is_empty() {
            output.push_str("## Keywords\n\n");
            output.push_str("| Keyword | Count |\n|---|---:|\n");
            for item in keywords {
                let keyword = item.keyword.as_deref().unwrap_or_default();
                let count = item
                    .count
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string());
                output.push_str(&format!("| {} | {} |\n", escape_md_cell(keyword), count));
            }
            output.push('\n');
        }

        if !matches.is_empty() {
            output.push_str("## Matches\n\n");
            for item in matches {
                let keyword = item.keyword.as_deref().unwrap_or_default();
                let excerpt = item.excerpt.as_deref().unwrap_or_default();
                output.push_str(&format!("- `{}` → \"{}\"", keyword, excerpt));
                if let Some(range) = &item.range {
                    output.push_str(&format!(" (bytes {}-{})", range.start, range.end));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        output
    }

    fn render_document_md(&self, output: &mut String, item: &ResultItem) {
        if let Some(path) = &item.path {
            output.push_str(&format!("### `{}`", path));
            if let Some(highlights) = item.meta.highlights {
                output.push_str(&format!(" ({} highlights)", highlights));
            }
            output.push('\n');
        }

        if let Some(excerpt) = &item.excerpt {
            output.push_str("\n```html\n");
            output.push_str(excerpt);
            if !excerpt.ends_with('\n') {
                output.push('\n');
            }
            output.push_str("```\n");
        }

        if item.meta.truncated {
            output.push_str("\n> ⚠️ Source was truncated\n");
        }

        output.push('\n');
    }

    /// Render as raw output: excerpts only
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.excerpt.clone())
            .collect::<Vec<_>>()
            .join("\n---\n")
    }
}

fn escape_md_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
