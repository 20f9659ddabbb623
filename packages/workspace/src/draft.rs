//! JSON document drafts.
//!
//! A draft is the loosely-typed description clients and files use to create
//! a document in one go:
//!
//! ```json
//! {
//!   "title": "Notes",
//!   "author": "Ada",
//!   "elements": [
//!     { "type": "heading", "content": "Intro", "level": 2, "styles": ["bold"] },
//!     { "type": "paragraph", "content": "Hello" }
//!   ]
//! }
//! ```

use folio_editor::{apply_styles, Document, DocumentBuilder, Element, ElementFactory};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDraft {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDraft {
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ElementDraft {
    pub fn new(element_type: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            element_type: element_type.into(),
            styles: Vec::new(),
            fields,
        }
    }

    pub fn build(&self) -> Element {
        let base = ElementFactory::create(&self.element_type, &self.fields);
        apply_styles(base, &self.styles)
    }
}

impl DocumentDraft {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn build(&self) -> Document {
        let mut builder = DocumentBuilder::new()
            .title(self.title.as_str())
            .author(self.author.as_str())
            .elements(self.elements.iter().map(ElementDraft::build));
        if let Some(metadata) = &self.metadata {
            builder = builder.metadata(metadata.as_str());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_editor::{ElementType, Renderable};

    #[test]
    fn test_draft_from_json() {
        let draft = DocumentDraft::from_json(
            r#"{
                "title": "Notes",
                "author": "Ada",
                "metadata": "draft",
                "elements": [
                    { "type": "heading", "content": "Intro", "level": "2", "styles": ["bold"] },
                    { "type": "list", "items": ["a", "b"], "ordered": true },
                    { "type": "unknown", "content": "raw" }
                ]
            }"#,
        )
        .unwrap();

        let doc = draft.build();
        assert_eq!(doc.title, "Notes");
        assert_eq!(doc.metadata.as_deref(), Some("draft"));
        assert_eq!(doc.len(), 3);
        assert_eq!(
            doc.elements()[0].render(),
            "<strong style=\"font-weight: bold;\"><h2>Intro</h2></strong>"
        );
        assert_eq!(doc.elements()[1].render(), "<ol><li>a</li><li>b</li></ol>");
        assert_eq!(doc.elements()[2].element_type(), ElementType::Paragraph);
    }

    #[test]
    fn test_missing_title_is_rejected() {
        assert!(DocumentDraft::from_json(r#"{ "author": "Ada" }"#).is_err());
    }
}
