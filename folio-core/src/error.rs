//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur in editor operations.
///
/// Pointer and store mutations never surface these: a stale element id is a
/// silent no-op there. Errors are reserved for loading documents, configuration,
/// templates and study storage.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A document violates its invariants (duplicate ids, dangling selection).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Document/config serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Template could not be instantiated.
    #[error("Template error: {0}")]
    Template(String),

    /// Study storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_convert_with_question_mark() {
        fn parse(json: &str) -> EditorResult<serde_json::Value> {
            Ok(serde_json::from_str(json)?)
        }
        fn read(path: &std::path::Path) -> EditorResult<String> {
            Ok(std::fs::read_to_string(path)?)
        }

        assert!(matches!(parse("{"), Err(EditorError::Serialization(_))));
        let missing = std::env::temp_dir().join("folio-missing-dir").join("nothing.json");
        let err = read(&missing).expect_err("missing file");
        assert!(matches!(err, EditorError::Io(_)));
        assert!(err.to_string().starts_with("IO error"));
    }
}
