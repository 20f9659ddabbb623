use crate::store::StoreError;
use folio_common::CoreError;
use folio_editor::{CommandError, EditorError, MementoError};
use folio_export::ExportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Element {element_id} not found in document {document_id}")]
    ElementNotFound {
        document_id: String,
        element_id: String,
    },

    #[error("Version '{label}' not found for document {document_id}")]
    VersionNotFound { document_id: String, label: String },

    #[error("Collaborator {observer_id} not attached to document {document_id}")]
    CollaboratorNotFound {
        document_id: String,
        observer_id: String,
    },

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl From<CommandError> for WorkspaceError {
    fn from(e: CommandError) -> Self {
        WorkspaceError::Editor(e.into())
    }
}

impl From<MementoError> for WorkspaceError {
    fn from(e: MementoError) -> Self {
        WorkspaceError::Editor(e.into())
    }
}

impl WorkspaceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WorkspaceError::Store(StoreError::NotFound(_))
                | WorkspaceError::ElementNotFound { .. }
                | WorkspaceError::VersionNotFound { .. }
                | WorkspaceError::CollaboratorNotFound { .. }
        )
    }
}

impl From<WorkspaceError> for CoreError {
    fn from(e: WorkspaceError) -> Self {
        match e {
            WorkspaceError::Store(inner) => inner.into(),
            WorkspaceError::ElementNotFound { element_id, .. } => {
                CoreError::not_found("element", element_id)
            }
            WorkspaceError::VersionNotFound { label, .. } => CoreError::not_found("version", label),
            WorkspaceError::CollaboratorNotFound { observer_id, .. } => {
                CoreError::not_found("observer", observer_id)
            }
            WorkspaceError::Editor(inner) => inner.into(),
            WorkspaceError::Export(inner) => inner.into(),
        }
    }
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
