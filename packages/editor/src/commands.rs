//! # Document Commands
//!
//! Reversible operations on a single document.
//!
//! Each command records the id of the document it was created for and keeps
//! whatever it needs to reverse itself:
//!
//! ### AddElement
//! - Appends the element
//! - Undo removes the last element
//!
//! ### RemoveElement
//! - Captures the removed element and its index
//! - Undo reinserts it at the same position
//!
//! ### ReplaceElement
//! - Captures the previous occupant of the slot
//! - Undo puts it back (used for field updates and for persisting styles)

use crate::document::{Document, DocumentError};
use crate::element::{Element, Renderable};
use folio_common::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Command recorded for document {expected} cannot run against {actual}")]
    DocumentMismatch { expected: String, actual: String },
}

impl From<CommandError> for CoreError {
    fn from(e: CommandError) -> Self {
        match e {
            CommandError::Document(inner) => inner.into(),
            CommandError::DocumentMismatch { .. } => CoreError::InvalidOperation(e.to_string()),
        }
    }
}

/// A reversible mutation of one document
pub trait Command: Send {
    /// Perform the mutation
    fn execute(&mut self, document: &mut Document) -> Result<(), CommandError>;

    /// Reverse a previous `execute`
    fn undo(&mut self, document: &mut Document) -> Result<(), CommandError>;

    /// Human-readable summary, e.g. "Add heading element"
    fn description(&self) -> &str;

    /// Id of the document this command belongs to
    fn document_id(&self) -> &str;
}

/// Fail unless `command` was recorded for `document`
pub fn ensure_target(command: &dyn Command, document: &Document) -> Result<(), CommandError> {
    if command.document_id() == document.id {
        Ok(())
    } else {
        Err(CommandError::DocumentMismatch {
            expected: command.document_id().to_string(),
            actual: document.id.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AddElementCommand {
    document_id: String,
    element: Element,
    description: String,
}

impl AddElementCommand {
    pub fn new(document: &Document, element: Element) -> Self {
        let description = format!("Add {} element", element.element_type());
        Self {
            document_id: document.id.clone(),
            element,
            description,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl Command for AddElementCommand {
    fn execute(&mut self, document: &mut Document) -> Result<(), CommandError> {
        document.add_element(self.element.clone());
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> Result<(), CommandError> {
        document.pop_element();
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn document_id(&self) -> &str {
        &self.document_id
    }
}

#[derive(Debug, Clone)]
pub struct RemoveElementCommand {
    document_id: String,
    index: usize,
    removed: Option<Element>,
    description: String,
}

impl RemoveElementCommand {
    pub fn new(document: &Document, index: usize) -> Self {
        Self {
            document_id: document.id.clone(),
            index,
            removed: None,
            description: format!("Remove element at index {}", index),
        }
    }

    /// The element taken out by the last `execute`, if it has not been undone
    pub fn removed(&self) -> Option<&Element> {
        self.removed.as_ref()
    }
}

impl Command for RemoveElementCommand {
    fn execute(&mut self, document: &mut Document) -> Result<(), CommandError> {
        self.removed = Some(document.remove_element(self.index)?);
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> Result<(), CommandError> {
        if let Some(element) = &self.removed {
            document.insert_element(self.index, element.clone())?;
            self.removed = None;
        }
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn document_id(&self) -> &str {
        &self.document_id
    }
}

#[derive(Debug, Clone)]
pub struct ReplaceElementCommand {
    document_id: String,
    index: usize,
    replacement: Element,
    previous: Option<Element>,
    description: String,
}

impl ReplaceElementCommand {
    pub fn new(document: &Document, index: usize, replacement: Element) -> Self {
        Self {
            document_id: document.id.clone(),
            index,
            replacement,
            previous: None,
            description: format!("Replace element at index {}", index),
        }
    }

    /// Replacement carrying edited fields
    pub fn update(document: &Document, index: usize, replacement: Element) -> Self {
        Self::new(document, index, replacement)
            .with_description(format!("Update element at index {}", index))
    }

    /// Replacement carrying the decorated form of the slot's element
    pub fn style(document: &Document, index: usize, styled: Element) -> Self {
        Self::new(document, index, styled)
            .with_description(format!("Apply styles to element at index {}", index))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Command for ReplaceElementCommand {
    fn execute(&mut self, document: &mut Document) -> Result<(), CommandError> {
        let previous = document.replace_element(self.index, self.replacement.clone())?;
        self.previous = Some(previous);
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> Result<(), CommandError> {
        if let Some(previous) = &self.previous {
            document.replace_element(self.index, previous.clone())?;
            self.previous = None;
        }
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn document_id(&self) -> &str {
        &self.document_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::apply_styles;

    fn doc_with(contents: &[&str]) -> Document {
        let mut doc = Document::new("Notes", "Ada");
        for content in contents {
            doc.add_element(Element::paragraph(*content));
        }
        doc
    }

    fn contents(doc: &Document) -> Vec<String> {
        doc.elements().iter().map(|e| e.content()).collect()
    }

    #[test]
    fn test_add_and_undo() {
        let mut doc = doc_with(&["a"]);
        let mut cmd = AddElementCommand::new(&doc, Element::heading("b", 2));
        assert_eq!(cmd.description(), "Add heading element");

        cmd.execute(&mut doc).unwrap();
        assert_eq!(contents(&doc), vec!["a", "b"]);

        cmd.undo(&mut doc).unwrap();
        assert_eq!(contents(&doc), vec!["a"]);
    }

    #[test]
    fn test_add_undo_on_empty_document_is_noop() {
        let mut doc = doc_with(&[]);
        let mut cmd = AddElementCommand::new(&doc, Element::paragraph("x"));
        assert!(cmd.undo(&mut doc).is_ok());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_remove_reinserts_at_same_index() {
        let mut doc = doc_with(&["a", "b", "c"]);
        let mut cmd = RemoveElementCommand::new(&doc, 1);

        cmd.execute(&mut doc).unwrap();
        assert_eq!(contents(&doc), vec!["a", "c"]);
        assert_eq!(cmd.removed().map(|e| e.content()), Some("b".to_string()));

        cmd.undo(&mut doc).unwrap();
        assert_eq!(contents(&doc), vec!["a", "b", "c"]);
        assert!(cmd.removed().is_none());
    }

    #[test]
    fn test_remove_out_of_range_fails() {
        let mut doc = doc_with(&["a"]);
        let mut cmd = RemoveElementCommand::new(&doc, 3);
        assert_eq!(
            cmd.execute(&mut doc),
            Err(CommandError::Document(DocumentError::IndexOutOfRange {
                index: 3,
                len: 1
            }))
        );
    }

    #[test]
    fn test_replace_with_styled_and_undo() {
        let mut doc = doc_with(&["plain"]);
        let original = doc.element(0).unwrap().clone();
        let styled = apply_styles(original.clone(), ["bold"]);

        let mut cmd = ReplaceElementCommand::style(&doc, 0, styled);
        assert_eq!(cmd.description(), "Apply styles to element at index 0");

        cmd.execute(&mut doc).unwrap();
        assert!(doc.element(0).unwrap().is_styled());

        cmd.undo(&mut doc).unwrap();
        assert_eq!(doc.element(0), Some(&original));
    }

    #[test]
    fn test_ensure_target_rejects_other_documents() {
        let doc = doc_with(&[]);
        let other = doc_with(&[]);
        let cmd = AddElementCommand::new(&doc, Element::paragraph("x"));

        assert!(ensure_target(&cmd, &doc).is_ok());
        assert!(matches!(
            ensure_target(&cmd, &other),
            Err(CommandError::DocumentMismatch { .. })
        ));
    }
}
