//! # Version Snapshots
//!
//! Point-in-time copies of a document and the caretaker that keeps them.
//!
//! A [`DocumentMemento`] is immutable once created: it holds a deep copy of
//! the element sequence, so later edits to the document never reach it.
//! The caretaker stores snapshots per document id as serialized element
//! payloads and rebuilds fresh mementos on every read.
//!
//! History is ordered by capture time, not save order: a snapshot taken
//! earlier but saved later still lists behind newer ones. Labels are not
//! unique. Saving twice under one label keeps both entries; lookups by
//! label return the newest.

use crate::document::Document;
use crate::element::Element;
use chrono::{DateTime, Utc};
use folio_common::sync::{read, write};
use folio_common::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MementoError {
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot of document {memento} cannot be stored under {target}")]
    DocumentMismatch { memento: String, target: String },
}

impl From<MementoError> for CoreError {
    fn from(e: MementoError) -> Self {
        match e {
            MementoError::Serialization(_) => CoreError::Serialization(e.to_string()),
            MementoError::DocumentMismatch { .. } => CoreError::InvalidOperation(e.to_string()),
        }
    }
}

/// Immutable snapshot of a document's content
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMemento {
    document_id: String,
    title: String,
    author: String,
    metadata: Option<String>,
    elements: Vec<Element>,
    label: String,
    captured_at: DateTime<Utc>,
}

impl DocumentMemento {
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            label: self.label.clone(),
            captured_at: self.captured_at,
            title: self.title.clone(),
            author: self.author.clone(),
            element_count: self.elements.len(),
        }
    }
}

/// Listing entry for a stored version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub label: String,
    pub captured_at: DateTime<Utc>,
    pub title: String,
    pub author: String,
    pub element_count: usize,
}

/// Capture the current state of `document` under `label`
pub fn create_memento(document: &Document, label: impl Into<String>) -> DocumentMemento {
    DocumentMemento {
        document_id: document.id.clone(),
        title: document.title.clone(),
        author: document.author.clone(),
        metadata: document.metadata.clone(),
        elements: document.elements().to_vec(),
        label: label.into(),
        captured_at: Utc::now(),
    }
}

/// Overwrite `document` with the snapshot's content
///
/// Identity, creation time and version counter are left alone; the element
/// sequence is a fresh copy so the memento stays reusable.
pub fn restore_from_memento(document: &mut Document, memento: &DocumentMemento) {
    document.title = memento.title.clone();
    document.author = memento.author.clone();
    document.metadata = memento.metadata.clone();
    document.set_elements(memento.elements.clone());
}

/// Stored form of a snapshot
#[derive(Debug, Clone)]
struct VersionRecord {
    label: String,
    title: String,
    author: String,
    metadata: Option<String>,
    elements_json: String,
    element_count: usize,
    captured_at: DateTime<Utc>,
}

impl VersionRecord {
    fn encode(memento: &DocumentMemento) -> Result<Self, MementoError> {
        Ok(Self {
            label: memento.label.clone(),
            title: memento.title.clone(),
            author: memento.author.clone(),
            metadata: memento.metadata.clone(),
            elements_json: serde_json::to_string(&memento.elements)?,
            element_count: memento.elements.len(),
            captured_at: memento.captured_at,
        })
    }

    fn decode(&self, document_id: &str) -> Result<DocumentMemento, MementoError> {
        Ok(DocumentMemento {
            document_id: document_id.to_string(),
            title: self.title.clone(),
            author: self.author.clone(),
            metadata: self.metadata.clone(),
            elements: serde_json::from_str(&self.elements_json)?,
            label: self.label.clone(),
            captured_at: self.captured_at,
        })
    }

    fn summary(&self) -> VersionSummary {
        VersionSummary {
            label: self.label.clone(),
            captured_at: self.captured_at,
            title: self.title.clone(),
            author: self.author.clone(),
            element_count: self.element_count,
        }
    }
}

/// Keeps version history per document id
#[derive(Debug, Default)]
pub struct MementoCaretaker {
    /// Records by capture time (oldest first); ties keep save order
    versions: RwLock<HashMap<String, Vec<VersionRecord>>>,
}

impl MementoCaretaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a snapshot into the document's history
    pub fn save_memento(
        &self,
        document_id: &str,
        memento: &DocumentMemento,
    ) -> Result<(), MementoError> {
        if memento.document_id != document_id {
            return Err(MementoError::DocumentMismatch {
                memento: memento.document_id.clone(),
                target: document_id.to_string(),
            });
        }

        let record = VersionRecord::encode(memento)?;
        let mut versions = write(&self.versions);
        let records = versions.entry(document_id.to_string()).or_default();
        let position = records.partition_point(|r| r.captured_at <= record.captured_at);
        records.insert(position, record);
        drop(versions);

        tracing::info!(
            document = document_id,
            label = memento.label(),
            "saved version"
        );
        Ok(())
    }

    /// Newest snapshot saved under `label`
    pub fn get_memento(
        &self,
        document_id: &str,
        label: &str,
    ) -> Result<Option<DocumentMemento>, MementoError> {
        let versions = read(&self.versions);
        versions
            .get(document_id)
            .and_then(|records| records.iter().rev().find(|r| r.label == label))
            .map(|record| record.decode(document_id))
            .transpose()
    }

    /// Every snapshot, newest first
    pub fn get_all_mementos(&self, document_id: &str) -> Result<Vec<DocumentMemento>, MementoError> {
        let versions = read(&self.versions);
        versions
            .get(document_id)
            .map(|records| {
                records
                    .iter()
                    .rev()
                    .map(|record| record.decode(document_id))
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    pub fn get_latest_memento(
        &self,
        document_id: &str,
    ) -> Result<Option<DocumentMemento>, MementoError> {
        let versions = read(&self.versions);
        versions
            .get(document_id)
            .and_then(|records| records.last())
            .map(|record| record.decode(document_id))
            .transpose()
    }

    /// Listing without decoding element payloads, newest first
    pub fn list_versions(&self, document_id: &str) -> Vec<VersionSummary> {
        let versions = read(&self.versions);
        versions
            .get(document_id)
            .map(|records| records.iter().rev().map(VersionRecord::summary).collect())
            .unwrap_or_default()
    }

    pub fn version_count(&self, document_id: &str) -> usize {
        read(&self.versions)
            .get(document_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Remove every snapshot stored under `label`
    pub fn delete_memento(&self, document_id: &str, label: &str) -> bool {
        let mut versions = write(&self.versions);
        let Some(records) = versions.get_mut(document_id) else {
            return false;
        };

        let before = records.len();
        records.retain(|record| record.label != label);
        let removed = records.len() != before;

        if records.is_empty() {
            versions.remove(document_id);
        }
        removed
    }

    pub fn clear_history(&self, document_id: &str) {
        write(&self.versions).remove(document_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Renderable;
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        let mut doc = Document::new("Notes", "Ada");
        doc.add_element(Element::paragraph("Hello"));
        doc
    }

    #[test]
    fn test_memento_is_isolated_from_later_edits() {
        let mut doc = sample();
        let memento = create_memento(&doc, "v1");

        doc.add_element(Element::paragraph("World"));
        doc.title = "Changed".to_string();

        assert_eq!(memento.elements().len(), 1);
        assert_eq!(memento.title(), "Notes");
        assert_eq!(memento.label(), "v1");
    }

    #[test]
    fn test_restore_keeps_identity() {
        let mut doc = sample();
        let id = doc.id.clone();
        let created = doc.created_at;
        let memento = create_memento(&doc, "v1");

        doc.title = "Draft".to_string();
        doc.metadata = Some("wip".to_string());
        doc.add_element(Element::heading("Extra", 2));

        restore_from_memento(&mut doc, &memento);
        assert_eq!(doc.id, id);
        assert_eq!(doc.created_at, created);
        assert_eq!(doc.title, "Notes");
        assert_eq!(doc.metadata, None);
        assert_eq!(doc.elements(), memento.elements());
    }

    #[test]
    fn test_restore_twice_does_not_share_elements() {
        let mut doc = sample();
        let memento = create_memento(&doc, "v1");

        restore_from_memento(&mut doc, &memento);
        doc.add_element(Element::paragraph("more"));
        restore_from_memento(&mut doc, &memento);

        assert_eq!(doc.len(), 1);
        assert_eq!(memento.elements().len(), 1);
    }

    #[test]
    fn test_caretaker_roundtrip_and_ordering() {
        let caretaker = MementoCaretaker::new();
        let mut doc = sample();

        caretaker
            .save_memento(&doc.id, &create_memento(&doc, "v1"))
            .unwrap();
        doc.add_element(Element::code("x", Some("rust".to_string())));
        caretaker
            .save_memento(&doc.id, &create_memento(&doc, "v2"))
            .unwrap();

        let all = caretaker.get_all_mementos(&doc.id).unwrap();
        let labels: Vec<_> = all.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["v2", "v1"]);

        let latest = caretaker.get_latest_memento(&doc.id).unwrap().unwrap();
        assert_eq!(latest.label(), "v2");
        assert_eq!(latest.elements()[1].render(), doc.elements()[1].render());

        let v1 = caretaker.get_memento(&doc.id, "v1").unwrap().unwrap();
        assert_eq!(v1.elements().len(), 1);
        assert_eq!(caretaker.version_count(&doc.id), 2);
    }

    #[test]
    fn test_history_follows_capture_time_not_save_order() {
        let caretaker = MementoCaretaker::new();
        let mut doc = sample();

        let mut early = create_memento(&doc, "early");
        early.captured_at = Utc::now() - chrono::Duration::minutes(5);
        doc.add_element(Element::paragraph("later"));
        let late = create_memento(&doc, "late");

        caretaker.save_memento(&doc.id, &late).unwrap();
        caretaker.save_memento(&doc.id, &early).unwrap();

        let labels: Vec<String> = caretaker
            .get_all_mementos(&doc.id)
            .unwrap()
            .iter()
            .map(|m| m.label().to_string())
            .collect();
        assert_eq!(labels, vec!["late", "early"]);

        let listed: Vec<String> = caretaker
            .list_versions(&doc.id)
            .into_iter()
            .map(|summary| summary.label)
            .collect();
        assert_eq!(listed, vec!["late", "early"]);

        let latest = caretaker.get_latest_memento(&doc.id).unwrap().unwrap();
        assert_eq!(latest.label(), "late");
        assert_eq!(latest.elements().len(), 2);
    }

    #[test]
    fn test_duplicate_labels_return_newest() {
        let caretaker = MementoCaretaker::new();
        let mut doc = sample();

        caretaker
            .save_memento(&doc.id, &create_memento(&doc, "draft"))
            .unwrap();
        doc.add_element(Element::paragraph("second"));
        caretaker
            .save_memento(&doc.id, &create_memento(&doc, "draft"))
            .unwrap();

        let found = caretaker.get_memento(&doc.id, "draft").unwrap().unwrap();
        assert_eq!(found.elements().len(), 2);
        assert_eq!(caretaker.version_count(&doc.id), 2);

        assert!(caretaker.delete_memento(&doc.id, "draft"));
        assert_eq!(caretaker.version_count(&doc.id), 0);
        assert!(!caretaker.delete_memento(&doc.id, "draft"));
    }

    #[test]
    fn test_missing_history() {
        let caretaker = MementoCaretaker::new();
        assert!(caretaker.get_memento("nope", "v1").unwrap().is_none());
        assert!(caretaker.get_latest_memento("nope").unwrap().is_none());
        assert!(caretaker.get_all_mementos("nope").unwrap().is_empty());
        assert!(caretaker.list_versions("nope").is_empty());
    }

    #[test]
    fn test_save_under_wrong_document_fails() {
        let caretaker = MementoCaretaker::new();
        let doc = sample();
        let memento = create_memento(&doc, "v1");

        let err = caretaker.save_memento("other", &memento).unwrap_err();
        assert!(matches!(err, MementoError::DocumentMismatch { .. }));
        assert_eq!(caretaker.version_count("other"), 0);
    }

    #[test]
    fn test_clear_history_and_summaries() {
        let caretaker = MementoCaretaker::new();
        let doc = sample();
        caretaker
            .save_memento(&doc.id, &create_memento(&doc, "v1"))
            .unwrap();

        let summaries = caretaker.list_versions(&doc.id);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].element_count, 1);
        assert_eq!(summaries[0].title, "Notes");

        caretaker.clear_history(&doc.id);
        assert_eq!(caretaker.version_count(&doc.id), 0);
    }
}
