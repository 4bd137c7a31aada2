//! Unified file reading strategies
//!
//! Documents and keyword lists are read through here so that non-UTF-8,
//! oversized and binary inputs are handled the same way everywhere.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::core::model::Meta;
use crate::core::util::{hash_bytes, truncate_string};

/// Default maximum file size in bytes (64 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Strategy for handling non-UTF-8 content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// Skip non-UTF-8 files entirely
    Skip,
    /// Use lossy conversion (replace invalid bytes with U+FFFD)
    #[default]
    Lossy,
}

/// Strategy for handling oversized files
///
/// Truncated markup loses its closing tags, so oversized sources are skipped
/// unless a caller opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeStrategy {
    /// Skip files exceeding the size limit
    #[default]
    Skip,
    /// Keep the first `max_file_size` bytes and mark as truncated
    Truncate,
}

/// Configuration for file reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReadConfig {
    /// Maximum file size to process (bytes)
    pub max_file_size: u64,

    /// How to handle non-UTF-8 content
    pub encoding_strategy: EncodingStrategy,

    /// How to handle oversized files
    pub size_strategy: SizeStrategy,
}

impl Default for FileReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            encoding_strategy: EncodingStrategy::Lossy,
            size_strategy: SizeStrategy::Skip,
        }
    }
}

impl FileReadConfig {
    pub fn with_max_file_size(max_file_size: u64) -> Self {
        Self {
            max_file_size,
            ..Default::default()
        }
    }
}

/// Warning codes for file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningCode {
    /// Source could not be opened or read
    ReadFailed,
    /// File was truncated due to size
    FileTruncated,
    /// File was skipped due to size
    FileSkippedSize,
    /// File was skipped due to encoding
    FileSkippedEncoding,
    /// Lossy encoding conversion used
    LossyConversion,
    /// File appears to be binary
    BinaryFile,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::ReadFailed => "READ_FAILED",
            WarningCode::FileTruncated => "FILE_TRUNCATED",
            WarningCode::FileSkippedSize => "FILE_SKIPPED_SIZE",
            WarningCode::FileSkippedEncoding => "FILE_SKIPPED_ENCODING",
            WarningCode::LossyConversion => "LOSSY_CONVERSION",
            WarningCode::BinaryFile => "BINARY_FILE",
        }
    }
}

/// A structured warning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileWarning {
    pub code: WarningCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl FileWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Result of reading a file
#[derive(Debug, Clone, Default)]
pub struct FileReadResult {
    /// The file content (if successfully read)
    pub content: Option<String>,

    /// Size of the file on disk
    pub size: u64,

    /// Whether the content was truncated
    pub truncated: bool,

    /// Whether lossy conversion was used
    pub lossy_conversion: bool,

    /// Warnings generated during reading; when `content` is None the last
    /// one explains why
    pub warnings: Vec<FileWarning>,
}

impl FileReadResult {
    fn skipped(warning: FileWarning) -> Self {
        Self {
            warnings: vec![warning],
            ..Default::default()
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.content.is_none()
    }

    /// The warning that caused the file to be skipped
    pub fn skip_warning(&self) -> Option<&FileWarning> {
        if self.is_skipped() {
            self.warnings.last()
        } else {
            None
        }
    }

    /// Size, hash and truncation flags for result metadata
    pub fn meta(&self) -> Meta {
        Meta {
            size: Some(self.size),
            hash: self.content.as_ref().map(|c| hash_bytes(c.as_bytes())),
            highlights: None,
            truncated: self.truncated,
        }
    }
}

/// Read a file with the given configuration
pub fn read_file_with_config(path: &Path, config: &FileReadConfig) -> FileReadResult {
    let display = path.display().to_string();

    let mut file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            return FileReadResult::skipped(
                FileWarning::new(WarningCode::ReadFailed, format!("Cannot open file: {}", e))
                    .with_path(display),
            );
        }
    };

    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    let oversized = size > config.max_file_size;

    if oversized && config.size_strategy == SizeStrategy::Skip {
        return FileReadResult::skipped(
            FileWarning::new(
                WarningCode::FileSkippedSize,
                format!(
                    "File exceeds size limit ({} > {} bytes)",
                    size, config.max_file_size
                ),
            )
            .with_path(display),
        );
    }

    let mut bytes = Vec::with_capacity(size.min(config.max_file_size) as usize);
    let read = if oversized {
        file.take(config.max_file_size).read_to_end(&mut bytes)
    } else {
        file.read_to_end(&mut bytes)
    };
    if let Err(e) = read {
        return FileReadResult::skipped(
            FileWarning::new(WarningCode::ReadFailed, format!("Cannot read file: {}", e))
                .with_path(display),
        );
    }

    // Null bytes in the first 8KB mean this is not a text document
    let check_len = std::cmp::min(8192, bytes.len());
    if bytes[..check_len].contains(&0) {
        return FileReadResult::skipped(
            FileWarning::new(
                WarningCode::BinaryFile,
                "File appears to be binary (contains null bytes)",
            )
            .with_path(display),
        );
    }

    let mut result = FileReadResult {
        size,
        ..Default::default()
    };

    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(err) => match config.encoding_strategy {
            EncodingStrategy::Skip => {
                return FileReadResult::skipped(
                    FileWarning::new(
                        WarningCode::FileSkippedEncoding,
                        "File contains invalid UTF-8 sequences",
                    )
                    .with_path(display),
                );
            }
            EncodingStrategy::Lossy => {
                let bytes = err.into_bytes();
                result.lossy_conversion = true;
                result.warnings.push(
                    FileWarning::new(
                        WarningCode::LossyConversion,
                        "Lossy UTF-8 conversion applied (some characters replaced)",
                    )
                    .with_path(display.clone()),
                );
                String::from_utf8_lossy(&bytes).into_owned()
            }
        },
    };

    let content = if oversized {
        let (kept, _) = truncate_string(&content, config.max_file_size as usize);
        result.truncated = true;
        result.warnings.push(
            FileWarning::new(
                WarningCode::FileTruncated,
                format!("Content truncated from {} to {} bytes", size, kept.len()),
            )
            .with_path(display),
        );
        kept
    } else {
        content
    };

    for warning in &result.warnings {
        warn!(code = warning.code.as_str(), path = ?warning.path, "{}", warning.message);
    }

    result.content = Some(content);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_file_read_config_default() {
        let config = FileReadConfig::default();
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.encoding_strategy, EncodingStrategy::Lossy);
        assert_eq!(config.size_strategy, SizeStrategy::Skip);
        assert_eq!(FileReadConfig::with_max_file_size(10).max_file_size, 10);
    }

    #[test]
    fn test_read_file_success() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("doc.html");
        fs::write(&file_path, "<p>Hello</p>").unwrap();

        let result = read_file_with_config(&file_path, &FileReadConfig::default());
        assert!(!result.is_skipped());
        assert_eq!(result.content.as_deref(), Some("<p>Hello</p>"));
        assert_eq!(result.size, 12);
        assert!(!result.truncated);
        assert!(result.warnings.is_empty());

        let meta = result.meta();
        assert_eq!(meta.size, Some(12));
        assert_eq!(meta.hash.map(|h| h.len()), Some(16));
    }

    #[test]
    fn test_read_file_skip_size() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("big.html");
        fs::write(&file_path, "Hello").unwrap();

        let result = read_file_with_config(&file_path, &FileReadConfig::with_max_file_size(1));
        assert!(result.is_skipped());
        assert_eq!(result.skip_warning().unwrap().code, WarningCode::FileSkippedSize);
    }

    #[test]
    fn test_read_file_truncate_size() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("big.txt");
        fs::write(&file_path, "Hello world").unwrap();

        let config = FileReadConfig {
            max_file_size: 5,
            size_strategy: SizeStrategy::Truncate,
            ..Default::default()
        };
        let result = read_file_with_config(&file_path, &config);
        assert_eq!(result.content.as_deref(), Some("Hello"));
        assert!(result.truncated);
        assert_eq!(result.warnings[0].code, WarningCode::FileTruncated);
    }

    #[test]
    fn test_read_file_binary() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("doc.docx");
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(&[0x50, 0x4B, 0x03, 0x04, 0x00, 0x00]).unwrap();

        let result = read_file_with_config(&file_path, &FileReadConfig::default());
        assert!(result.is_skipped());
        assert_eq!(result.skip_warning().unwrap().code, WarningCode::BinaryFile);
    }

    #[test]
    fn test_read_file_lossy_conversion() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("latin1.txt");
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(&[0x63, 0x61, 0x66, 0xE9]).unwrap();

        let result = read_file_with_config(&file_path, &FileReadConfig::default());
        assert!(result.lossy_conversion);
        assert_eq!(result.content.as_deref(), Some("caf\u{FFFD}"));
        assert_eq!(result.warnings[0].code, WarningCode::LossyConversion);
    }

    #[test]
    fn test_read_file_skip_encoding() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("latin1.txt");
        fs::write(&file_path, [0xFF, 0xFE, 0x48]).unwrap();

        let config = FileReadConfig {
            encoding_strategy: EncodingStrategy::Skip,
            ..Default::default()
        };
        let result = read_file_with_config(&file_path, &config);
        assert!(result.is_skipped());
        assert_eq!(
            result.skip_warning().unwrap().code,
            WarningCode::FileSkippedEncoding
        );
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_file_with_config(Path::new("/nonexistent/file.html"), &FileReadConfig::default());
        assert!(result.is_skipped());
        assert_eq!(result.skip_warning().unwrap().code, WarningCode::ReadFailed);
    }

    #[test]
    fn test_file_warning_with_path() {
        let warning =
            FileWarning::new(WarningCode::BinaryFile, "binary").with_path("docs/a.docx");
        assert_eq!(warning.path.as_deref(), Some("docs/a.docx"));
        assert_eq!(warning.code.as_str(), "BINARY_FILE");
    }
}
