//! Document storage boundary.
//!
//! Saves are optimistic: a document may only overwrite the stored copy when
//! it carries the version it was loaded with. Each accepted update stores
//! `version + 1`. Deleting moves a document to the recycle bin, where it can
//! be restored or purged.

use chrono::{DateTime, Utc};
use folio_common::sync::{read, write};
use folio_common::CoreError;
use folio_editor::Document;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Version conflict on {id}: expected {expected}, found {found}")]
    VersionConflict { id: String, expected: u64, found: u64 },
}

impl From<StoreError> for CoreError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => CoreError::not_found("document", id),
            StoreError::VersionConflict {
                id,
                expected,
                found,
            } => CoreError::Conflict {
                id,
                expected,
                found,
            },
        }
    }
}

pub trait DocumentStore: Send + Sync {
    /// Load an active (not deleted) document
    fn load(&self, id: &str) -> Result<Document, StoreError>;

    /// Insert a new document or update an existing one, returning the stored copy
    fn save(&self, document: &Document) -> Result<Document, StoreError>;

    /// Move a document to the recycle bin
    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Active documents, oldest first
    fn list_all(&self) -> Vec<Document>;

    /// Bring a document back from the recycle bin
    fn restore(&self, id: &str) -> Result<(), StoreError>;

    /// Remove a document for good, whether deleted or not
    fn purge(&self, id: &str) -> Result<(), StoreError>;

    /// Deleted documents, most recently deleted first
    fn recycle_bin(&self) -> Vec<Document>;
}

#[derive(Debug, Clone)]
struct StoredDocument {
    document: Document,
    deleted_at: Option<DateTime<Utc>>,
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Document, StoreError> {
        read(&self.documents)
            .get(id)
            .filter(|stored| stored.deleted_at.is_none())
            .map(|stored| stored.document.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn save(&self, document: &Document) -> Result<Document, StoreError> {
        let mut documents = write(&self.documents);

        let stored = match documents.entry(document.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(StoredDocument {
                    document: document.clone(),
                    deleted_at: None,
                });
                return Ok(document.clone());
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        if stored.deleted_at.is_some() {
            return Err(StoreError::NotFound(document.id.clone()));
        }
        if stored.document.version != document.version {
            return Err(StoreError::VersionConflict {
                id: document.id.clone(),
                expected: document.version,
                found: stored.document.version,
            });
        }

        let mut copy = document.clone();
        copy.version += 1;
        stored.document = copy.clone();
        Ok(copy)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        match write(&self.documents).get_mut(id) {
            Some(stored) if stored.deleted_at.is_none() => {
                stored.deleted_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(StoreError::NotFound(id.to_string())),
        }
    }

    fn list_all(&self) -> Vec<Document> {
        let mut documents: Vec<Document> = read(&self.documents)
            .values()
            .filter(|stored| stored.deleted_at.is_none())
            .map(|stored| stored.document.clone())
            .collect();
        documents.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        documents
    }

    fn restore(&self, id: &str) -> Result<(), StoreError> {
        match write(&self.documents).get_mut(id) {
            Some(stored) if stored.deleted_at.is_some() => {
                stored.deleted_at = None;
                Ok(())
            }
            _ => Err(StoreError::NotFound(id.to_string())),
        }
    }

    fn purge(&self, id: &str) -> Result<(), StoreError> {
        write(&self.documents)
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn recycle_bin(&self) -> Vec<Document> {
        let mut deleted: Vec<(DateTime<Utc>, Document)> = read(&self.documents)
            .values()
            .filter_map(|stored| stored.deleted_at.map(|at| (at, stored.document.clone())))
            .collect();
        deleted.sort_by(|a, b| b.0.cmp(&a.0));
        deleted.into_iter().map(|(_, document)| document).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_editor::Element;

    #[test]
    fn test_insert_keeps_version_and_update_increments() {
        let store = MemoryStore::new();
        let doc = Document::new("Notes", "Ada");

        let stored = store.save(&doc).unwrap();
        assert_eq!(stored.version, 0);

        let mut loaded = store.load(&doc.id).unwrap();
        loaded.add_element(Element::paragraph("Hello"));
        let updated = store.save(&loaded).unwrap();
        assert_eq!(updated.version, 1);
        assert_eq!(store.load(&doc.id).unwrap().len(), 1);
    }

    #[test]
    fn test_stale_save_conflicts() {
        let store = MemoryStore::new();
        let doc = Document::new("Notes", "Ada");
        store.save(&doc).unwrap();

        let first = store.load(&doc.id).unwrap();
        let second = store.load(&doc.id).unwrap();
        store.save(&first).unwrap();

        assert_eq!(
            store.save(&second),
            Err(StoreError::VersionConflict {
                id: doc.id.clone(),
                expected: 0,
                found: 1
            })
        );
    }

    #[test]
    fn test_recycle_bin_lifecycle() {
        let store = MemoryStore::new();
        let doc = Document::new("Notes", "Ada");
        store.save(&doc).unwrap();

        store.delete(&doc.id).unwrap();
        assert!(matches!(store.load(&doc.id), Err(StoreError::NotFound(_))));
        assert!(store.list_all().is_empty());
        assert_eq!(store.recycle_bin().len(), 1);
        assert!(store.delete(&doc.id).is_err());

        store.restore(&doc.id).unwrap();
        assert!(store.load(&doc.id).is_ok());
        assert!(store.recycle_bin().is_empty());
        assert!(store.restore(&doc.id).is_err());

        store.delete(&doc.id).unwrap();
        store.purge(&doc.id).unwrap();
        assert!(store.recycle_bin().is_empty());
        assert!(store.purge(&doc.id).is_err());
    }

    #[test]
    fn test_conflict_classifies_as_core_conflict() {
        let core: CoreError = StoreError::VersionConflict {
            id: "d".to_string(),
            expected: 1,
            found: 2,
        }
        .into();
        assert_eq!(
            core,
            CoreError::Conflict {
                id: "d".to_string(),
                expected: 1,
                found: 2
            }
        );
    }
}
