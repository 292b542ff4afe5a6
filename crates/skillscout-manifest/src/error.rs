//! Error types for manifest parsing

use thiserror::Error;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, ManifestError>;

/// Errors that can occur when parsing a SKILL.md document
///
/// The parser is lenient by design, so this enum is small: structural
/// problems (missing frontmatter, malformed YAML, unknown keys) degrade to a
/// body-only parse instead of failing.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The document is empty or whitespace-only
    #[error("Empty skill document")]
    EmptyDocument,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message() {
        let err = ManifestError::EmptyDocument;
        assert!(err.to_string().contains("Empty"));
    }
}
