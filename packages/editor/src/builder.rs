//! Fluent construction of documents.

use crate::document::Document;
use crate::element::Element;

#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    title: String,
    author: String,
    metadata: Option<String>,
    elements: Vec<Element>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.elements.extend(elements);
        self
    }

    /// Discard everything collected so far
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Produce a document with a fresh id and leave the builder empty
    pub fn build(&mut self) -> Document {
        let parts = std::mem::take(self);

        let mut document = Document::new(parts.title, parts.author);
        document.metadata = parts.metadata;
        document.set_elements(parts.elements);
        document.last_modified = document.created_at;
        document
    }
}
