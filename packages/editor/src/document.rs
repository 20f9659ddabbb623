//! # Document
//!
//! The aggregate root: identity, metadata and the ordered element sequence.
//!
//! Element order is significant; rendering, structure and export all follow
//! it. Every element add/remove/replace bumps `last_modified`. The `version`
//! counter is owned by the storage boundary, which increments it on each
//! successful save and rejects saves whose version no longer matches.

use crate::element::Element;
use chrono::{DateTime, Utc};
use folio_common::{new_id, CoreError, ElementId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Element index {index} out of range (document has {len} elements)")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<DocumentError> for CoreError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::IndexOutOfRange { index, .. } => {
                CoreError::not_found("element", index.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(default)]
    elements: Vec<Element>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    /// Optimistic concurrency counter
    #[serde(default)]
    pub version: u64,
}

impl Document {
    /// Create an empty document with a fresh identity
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self::with_id(new_id(), title, author)
    }

    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            metadata: None,
            elements: Vec::new(),
            created_at: now,
            last_modified: now,
            version: 0,
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Find an element by identity, returning its position
    pub fn find_element(&self, id: ElementId) -> Option<(usize, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .find(|(_, element)| element.id() == id)
    }

    /// Append an element
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
        self.touch();
    }

    /// Insert at `index` (`index == len` appends)
    pub fn insert_element(&mut self, index: usize, element: Element) -> Result<(), DocumentError> {
        if index > self.elements.len() {
            return Err(self.out_of_range(index));
        }
        self.elements.insert(index, element);
        self.touch();
        Ok(())
    }

    pub fn remove_element(&mut self, index: usize) -> Result<Element, DocumentError> {
        if index >= self.elements.len() {
            return Err(self.out_of_range(index));
        }
        let removed = self.elements.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Remove the last element, if any
    pub fn pop_element(&mut self) -> Option<Element> {
        let popped = self.elements.pop();
        if popped.is_some() {
            self.touch();
        }
        popped
    }

    /// Replace the element at `index`, returning the previous occupant
    pub fn replace_element(&mut self, index: usize, element: Element) -> Result<Element, DocumentError> {
        let len = self.elements.len();
        let slot = self
            .elements
            .get_mut(index)
            .ok_or(DocumentError::IndexOutOfRange { index, len })?;
        let previous = std::mem::replace(slot, element);
        self.touch();
        Ok(previous)
    }

    /// Replace the whole element sequence
    pub fn set_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.touch();
    }

    /// Mark the document as modified now
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    fn out_of_range(&self, index: usize) -> DocumentError {
        DocumentError::IndexOutOfRange {
            index,
            len: self.elements.len(),
        }
    }
}
