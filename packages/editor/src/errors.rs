//! Error types for the editor

use crate::commands::CommandError;
use crate::document::DocumentError;
use crate::memento::MementoError;
use crate::structure::StructureError;
use folio_common::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),

    #[error("Version error: {0}")]
    Memento(#[from] MementoError),
}

impl From<EditorError> for CoreError {
    fn from(e: EditorError) -> Self {
        match e {
            EditorError::Document(inner) => inner.into(),
            EditorError::Command(inner) => inner.into(),
            EditorError::Structure(inner) => inner.into(),
            EditorError::Memento(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_into_core_taxonomy() {
        let missing: CoreError =
            EditorError::from(DocumentError::IndexOutOfRange { index: 4, len: 1 }).into();
        assert!(missing.is_not_found());

        let leaf: CoreError =
            EditorError::from(StructureError::UnsupportedOnLeaf { operation: "add" }).into();
        assert!(matches!(leaf, CoreError::InvalidOperation(_)));

        let mismatch: CoreError = EditorError::from(CommandError::DocumentMismatch {
            expected: "a".to_string(),
            actual: "b".to_string(),
        })
        .into();
        assert!(matches!(mismatch, CoreError::InvalidOperation(_)));
    }
}
