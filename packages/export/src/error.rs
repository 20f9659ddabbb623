use folio_common::CoreError;
use thiserror::Error;

/// Errors that can occur during export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF error: {0}")]
    Pdf(String),
}

impl From<ExportError> for CoreError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::UnsupportedFormat(_) => CoreError::InvalidOperation(e.to_string()),
            ExportError::Pdf(_) => CoreError::Serialization(e.to_string()),
        }
    }
}
