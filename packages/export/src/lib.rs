//! Folio document exporters.
//!
//! Each format is an [`ExportStrategy`]; the [`ExportRegistry`] selects one
//! by name and never falls back to a default for unknown names.

mod context;
mod error;
mod html;
mod markdown;
mod pdf;
mod registry;
mod strategy;

pub use context::ExportOptions;
pub use error::ExportError;
pub use html::HtmlExporter;
pub use markdown::MarkdownExporter;
pub use pdf::PdfExporter;
pub use registry::{ExportRegistry, ExportedDocument, FormatInfo};
pub use strategy::ExportStrategy;
