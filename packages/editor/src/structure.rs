//! # Document Structure
//!
//! A disposable Section/Leaf tree derived from a document's flat element
//! list. The tree is rebuilt on every request and never persisted, so it can
//! not drift out of sync with the document.
//!
//! Only sections hold children. Structural mutation on a leaf fails with
//! [`StructureError::UnsupportedOnLeaf`] instead of silently doing nothing.

use crate::document::Document;
use crate::element::{Element, Renderable};
use folio_common::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Operation not supported on a leaf: {operation}")]
    UnsupportedOnLeaf { operation: &'static str },

    #[error("Child index {index} out of range (section has {len} children)")]
    ChildIndexOutOfRange { index: usize, len: usize },
}

impl From<StructureError> for CoreError {
    fn from(e: StructureError) -> Self {
        match e {
            StructureError::UnsupportedOnLeaf { .. } => CoreError::InvalidOperation(e.to_string()),
            StructureError::ChildIndexOutOfRange { index, .. } => {
                CoreError::not_found("child", index.to_string())
            }
        }
    }
}

/// Node of the structure tree
pub trait DocumentComponent: fmt::Debug + Send + Sync {
    fn name(&self) -> String;

    /// `"section"` for sections, the element type tag for leaves
    fn kind(&self) -> &'static str;

    fn render(&self) -> String;

    fn add(&mut self, child: Box<dyn DocumentComponent>) -> Result<(), StructureError>;

    fn remove(&mut self, index: usize) -> Result<Box<dyn DocumentComponent>, StructureError>;

    fn children(&self) -> &[Box<dyn DocumentComponent>];

    /// Depth in the tree; the root section is level 0
    fn level(&self) -> usize;

    fn set_level(&mut self, level: usize);

    /// Serializable snapshot of this subtree
    fn outline(&self) -> OutlineNode {
        OutlineNode {
            name: self.name(),
            kind: self.kind().to_string(),
            level: self.level(),
            children: self.children().iter().map(|child| child.outline()).collect(),
        }
    }
}

/// Plain-data view of a structure tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub name: String,
    pub kind: String,
    pub level: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

/// Composite node: a named container of components
#[derive(Debug)]
pub struct Section {
    name: String,
    level: usize,
    children: Vec<Box<dyn DocumentComponent>>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 0,
            children: Vec::new(),
        }
    }

    /// Append a child, setting its level to this section's level + 1
    pub fn push(&mut self, mut child: Box<dyn DocumentComponent>) {
        child.set_level(self.level + 1);
        self.children.push(child);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl DocumentComponent for Section {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> &'static str {
        "section"
    }

    fn render(&self) -> String {
        let heading = (self.level + 1).min(6);
        let mut html = format!("<h{0}>{1}</h{0}>\n", heading, self.name);

        html.push_str(&format!(
            "<div class=\"section\" data-level=\"{}\">\n",
            self.level
        ));
        for child in &self.children {
            html.push_str(&child.render());
            html.push('\n');
        }
        html.push_str("</div>\n");

        html
    }

    fn add(&mut self, child: Box<dyn DocumentComponent>) -> Result<(), StructureError> {
        self.push(child);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Result<Box<dyn DocumentComponent>, StructureError> {
        if index >= self.children.len() {
            return Err(StructureError::ChildIndexOutOfRange {
                index,
                len: self.children.len(),
            });
        }
        Ok(self.children.remove(index))
    }

    fn children(&self) -> &[Box<dyn DocumentComponent>] {
        &self.children
    }

    fn level(&self) -> usize {
        self.level
    }

    fn set_level(&mut self, level: usize) {
        self.level = level;
        for child in &mut self.children {
            child.set_level(level + 1);
        }
    }
}

/// Leaf node wrapping one element
#[derive(Debug)]
pub struct ElementLeaf {
    element: Element,
    level: usize,
}

impl ElementLeaf {
    pub fn new(element: Element) -> Self {
        Self { element, level: 0 }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl DocumentComponent for ElementLeaf {
    fn name(&self) -> String {
        format!("{}: {}", self.element.element_type(), self.element.content())
    }

    fn kind(&self) -> &'static str {
        self.element.element_type().as_str()
    }

    fn render(&self) -> String {
        self.element.render()
    }

    fn add(&mut self, _child: Box<dyn DocumentComponent>) -> Result<(), StructureError> {
        Err(StructureError::UnsupportedOnLeaf { operation: "add" })
    }

    fn remove(&mut self, _index: usize) -> Result<Box<dyn DocumentComponent>, StructureError> {
        Err(StructureError::UnsupportedOnLeaf { operation: "remove" })
    }

    fn children(&self) -> &[Box<dyn DocumentComponent>] {
        &[]
    }

    fn level(&self) -> usize {
        self.level
    }

    fn set_level(&mut self, level: usize) {
        self.level = level;
    }
}

/// Build the structure tree for a document
///
/// The root section is named after the title; each element becomes a level-1
/// leaf in document order.
pub fn build_structure(document: &Document) -> Section {
    let mut root = Section::new(document.title.clone());
    for element in document.elements() {
        root.push(Box::new(ElementLeaf::new(element.clone())));
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_document() -> Document {
        let mut doc = Document::new("Notes", "Ada");
        doc.add_element(Element::paragraph("Hello"));
        doc.add_element(Element::heading("Section", 2));
        doc
    }

    #[test]
    fn test_build_structure_levels_and_order() {
        let root = build_structure(&sample_document());
        assert_eq!(root.name(), "Notes");
        assert_eq!(root.level(), 0);
        assert_eq!(root.len(), 2);

        let names: Vec<_> = root.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["paragraph: Hello", "heading: Section"]);
        assert!(root.children().iter().all(|c| c.level() == 1));
    }

    #[test]
    fn test_section_render() {
        let root = build_structure(&sample_document());
        assert_eq!(
            root.render(),
            "<h1>Notes</h1>\n\
             <div class=\"section\" data-level=\"0\">\n\
             <p>Hello</p>\n\
             <h2>Section</h2>\n\
             </div>\n"
        );
    }

    #[test]
    fn test_nested_sections_propagate_levels() {
        let mut chapter = Section::new("Chapter");
        chapter.push(Box::new(ElementLeaf::new(Element::paragraph("body"))));

        let mut root = Section::new("Book");
        root.add(Box::new(chapter)).unwrap();

        let chapter = &root.children()[0];
        assert_eq!(chapter.level(), 1);
        assert_eq!(chapter.children()[0].level(), 2);
        assert!(chapter.render().starts_with("<h2>Chapter</h2>"));
    }

    #[test]
    fn test_heading_size_caps_at_six() {
        let mut deep = Section::new("Deep");
        deep.set_level(9);
        assert!(deep.render().starts_with("<h6>Deep</h6>"));
    }

    #[test]
    fn test_leaf_rejects_structural_mutation() {
        let mut leaf = ElementLeaf::new(Element::paragraph("x"));
        let child = Box::new(ElementLeaf::new(Element::paragraph("y")));

        assert_eq!(
            leaf.add(child),
            Err(StructureError::UnsupportedOnLeaf { operation: "add" })
        );
        assert_eq!(
            leaf.remove(0).unwrap_err(),
            StructureError::UnsupportedOnLeaf { operation: "remove" }
        );
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn test_section_remove_out_of_range() {
        let mut root = build_structure(&sample_document());
        assert!(matches!(
            root.remove(5),
            Err(StructureError::ChildIndexOutOfRange { index: 5, len: 2 })
        ));
        let removed = root.remove(0).unwrap();
        assert_eq!(removed.kind(), "paragraph");
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn test_outline_snapshot() {
        let outline = build_structure(&sample_document()).outline();
        assert_eq!(outline.kind, "section");
        assert_eq!(outline.children.len(), 2);
        assert_eq!(outline.children[1].kind, "heading");
        assert_eq!(outline.children[1].level, 1);
    }
}
