//! Editor content stores: page documents (JSON) and hubdb tables (CSV).

pub mod document;
pub mod pages;
pub mod table;

use thiserror::Error;

/// Store-level errors, translated to HTTP status codes at the editor
/// boundary only.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("unexpected IO error")]
    Io(#[from] std::io::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Validate a record name used as a file stem.
///
/// Rejects empty names and anything that could escape the store
/// directory.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::Validation("name must not be empty".into()));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StoreError::Validation(format!("invalid name: `{name}`")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_accepts_simple_names() {
        assert!(validate_name("contact").is_ok());
        assert!(validate_name("hubdb_projects").is_ok());
        assert!(validate_name("page-2").is_ok());
    }

    #[test]
    fn test_validate_name_rejects_empty() {
        assert!(matches!(
            validate_name(""),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_name_rejects_traversal() {
        assert!(validate_name("..").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("a\\b").is_err());
    }
}
