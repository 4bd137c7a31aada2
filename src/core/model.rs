//! Unified Result Model
//!
//! Every command maps its output to this model before rendering.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Document,
    Keyword,
    Match,
    Error,
}

/// Byte-based range within one text run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeByte {
    pub start: u64,
    pub end: u64,
}

impl RangeByte {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u64,
            end: end as u64,
        }
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Source size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Content hash (XXH3) of the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Number of highlight markers inserted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<usize>,

    /// Whether the source was truncated while reading
    #[serde(default)]
    pub truncated: bool,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KwError {
    pub code: String,
    pub message: String,
}

impl KwError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Document path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Keyword this item is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,

    /// Occurrence count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// Byte range within a text run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeByte>,

    /// Annotated markup or matched text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured data payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<KwError>,
}

impl ResultItem {
    fn empty(kind: Kind) -> Self {
        Self {
            kind,
            path: None,
            keyword: None,
            count: None,
            range: None,
            excerpt: None,
            data: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a document result
    pub fn document(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::empty(Kind::Document)
        }
    }

    /// Create a keyword result, with or without a count
    pub fn keyword(keyword: impl Into<String>, count: Option<usize>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            count,
            ..Self::empty(Kind::Keyword)
        }
    }

    /// Create a match result for one occurrence
    pub fn match_result(
        path: impl Into<String>,
        keyword: impl Into<String>,
        range: RangeByte,
        excerpt: impl Into<String>,
    ) -> Self {
        Self {
            path: Some(path.into()),
            keyword: Some(keyword.into()),
            range: Some(range),
            excerpt: Some(excerpt.into()),
            ..Self::empty(Kind::Match)
        }
    }

    /// Create a new error result
    pub fn error(error: KwError) -> Self {
        Self {
            errors: vec![error],
            ..Self::empty(Kind::Error)
        }
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set the excerpt
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
