use thiserror::Error;

/// Error taxonomy shared by every folio crate
///
/// Crate-level errors convert into this type so callers can classify a
/// failure without matching on each crate's enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A document, element, memento version or observer does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Structural misuse, e.g. adding a child to a leaf
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A snapshot could not be written or read back
    #[error("Serialization failure: {0}")]
    Serialization(String),

    /// Optimistic concurrency check failed at the storage boundary
    #[error("Version conflict on {id}: expected {expected}, found {found}")]
    Conflict { id: String, expected: u64, found: u64 },
}

impl CoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

impl From<String> for CoreError {
    fn from(s: String) -> Self {
        CoreError::InvalidOperation(s)
    }
}

impl From<&str> for CoreError {
    fn from(s: &str) -> Self {
        CoreError::InvalidOperation(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = CoreError::not_found("document", "doc-1");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "document not found: doc-1");
    }

    #[test]
    fn test_string_becomes_invalid_operation() {
        let err: CoreError = "cannot add to leaf".into();
        assert_eq!(
            err,
            CoreError::InvalidOperation("cannot add to leaf".to_string())
        );
    }
}
