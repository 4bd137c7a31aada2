//! Ingest module - Turning files into annotation inputs
//!
//! Provides:
//! - document: Markup or plain-text files into a DocumentTree
//! - keywords: First-column keyword lists from CSV/TSV/plain-text files

pub mod document;
pub mod keywords;

use thiserror::Error;

use crate::core::file_reader::{FileWarning, WarningCode};
use crate::core::model::{KwError, ResultItem};

/// A user-facing failure while loading an input file
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be read as text
    #[error("{path}: {message}")]
    Unreadable {
        path: String,
        code: WarningCode,
        message: String,
    },

    /// The keyword list had nothing usable in its first column
    #[error("no keywords found in the first column of {path}")]
    NoKeywords { path: String },
}

impl IngestError {
    pub(crate) fn unreadable(path: &str, warning: Option<&FileWarning>) -> Self {
        match warning {
            Some(warning) => IngestError::Unreadable {
                path: path.to_string(),
                code: warning.code,
                message: warning.message.clone(),
            },
            None => IngestError::Unreadable {
                path: path.to_string(),
                code: WarningCode::ReadFailed,
                message: "file could not be read".to_string(),
            },
        }
    }

    /// Stable error code for result items
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::Unreadable { code, .. } => code.as_str(),
            IngestError::NoKeywords { .. } => "NO_KEYWORDS",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            IngestError::Unreadable { path, .. } | IngestError::NoKeywords { path } => path,
        }
    }

    /// Convert to a ResultItem (Kind::Error)
    pub fn to_result_item(&self) -> ResultItem {
        let message = match self {
            IngestError::Unreadable { message, .. } => message.clone(),
            IngestError::NoKeywords { .. } => self.to_string(),
        };
        let mut item = ResultItem::error(KwError::new(self.code(), message));
        item.path = Some(self.path().to_string());
        item
    }
}
