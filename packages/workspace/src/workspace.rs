//! # Workspace Service
//!
//! The in-process surface an API layer calls. Every operation follows the
//! same shape:
//!
//! ```text
//! load from store → run engine (command / memento / export) → save → notify
//! ```
//!
//! Edits to one document are serialized by a per-document gate; the store's
//! version check catches writers that bypass this service. When a save fails
//! after a command ran, the command is dropped from history so the stacks
//! stay in step with what was persisted.

use crate::config::WorkspaceConfig;
use crate::draft::DocumentDraft;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::observer::{Collaborator, NotifyReport, ObserverRegistry};
use crate::store::{DocumentStore, MemoryStore};
use folio_common::sync::lock;
use folio_common::{new_id, ElementId};
use folio_editor::{
    apply_styles, build_structure, create_memento, restore_from_memento, AddElementCommand,
    Command, CommandHistory, Document, DocumentBuilder, DocumentError, EditorError, Element,
    ElementFactory, MementoCaretaker, RemoveElementCommand, Renderable, ReplaceElementCommand,
    Section, VersionSummary,
};
use folio_export::{ExportRegistry, ExportedDocument, FormatInfo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Result of an undo or redo request
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStep {
    /// `false` when there was nothing to undo/redo
    pub applied: bool,
    pub document: Document,
}

/// Public view of an attached collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorInfo {
    pub id: String,
    pub name: String,
}

pub struct Workspace {
    store: Arc<dyn DocumentStore>,
    history: CommandHistory,
    versions: MementoCaretaker,
    observers: ObserverRegistry,
    exports: ExportRegistry,
    gates: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Workspace {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            history: CommandHistory::with_max_depth(config.history_depth),
            versions: MementoCaretaker::new(),
            observers: ObserverRegistry::new(),
            exports: ExportRegistry::new(),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_observers(mut self, observers: ObserverRegistry) -> Self {
        self.observers = observers;
        self
    }

    pub fn with_exports(mut self, exports: ExportRegistry) -> Self {
        self.exports = exports;
        self
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    // ---- documents -------------------------------------------------------

    pub fn create_document(
        &self,
        title: &str,
        author: &str,
        metadata: Option<&str>,
    ) -> WorkspaceResult<Document> {
        let mut builder = DocumentBuilder::new().title(title).author(author);
        if let Some(metadata) = metadata {
            builder = builder.metadata(metadata);
        }
        self.insert(builder.build())
    }

    pub fn create_from_draft(&self, draft: &DocumentDraft) -> WorkspaceResult<Document> {
        self.insert(draft.build())
    }

    fn insert(&self, document: Document) -> WorkspaceResult<Document> {
        let saved = self.store.save(&document)?;
        tracing::info!(document = %saved.id, title = %saved.title, "created document");
        Ok(saved)
    }

    pub fn get_document(&self, document_id: &str) -> WorkspaceResult<Document> {
        Ok(self.store.load(document_id)?)
    }

    pub fn list_documents(&self) -> Vec<Document> {
        self.store.list_all()
    }

    /// Move a document to the recycle bin
    pub fn delete_document(&self, document_id: &str) -> WorkspaceResult<()> {
        self.store.delete(document_id)?;
        tracing::info!(document = document_id, "moved document to recycle bin");
        Ok(())
    }

    pub fn restore_document(&self, document_id: &str) -> WorkspaceResult<Document> {
        self.store.restore(document_id)?;
        tracing::info!(document = document_id, "restored document from recycle bin");
        self.get_document(document_id)
    }

    /// Remove a document and everything kept about it
    pub fn purge_document(&self, document_id: &str) -> WorkspaceResult<()> {
        self.store.purge(document_id)?;
        self.history.clear(document_id);
        self.versions.clear_history(document_id);
        self.observers.clear(document_id);
        lock(&self.gates).remove(document_id);
        tracing::info!(document = document_id, "purged document");
        Ok(())
    }

    pub fn recycle_bin(&self) -> Vec<Document> {
        self.store.recycle_bin()
    }

    // ---- elements --------------------------------------------------------

    /// Create an element from raw fields and append it
    pub fn add_element(
        &self,
        document_id: &str,
        type_tag: &str,
        fields: &Map<String, Value>,
    ) -> WorkspaceResult<Document> {
        self.append_element(document_id, ElementFactory::create(type_tag, fields))
    }

    pub fn append_element(&self, document_id: &str, element: Element) -> WorkspaceResult<Document> {
        let message = format!("Element added: {}", element.element_type());
        let saved = self.run_command(document_id, |doc| {
            let command: Box<dyn Command> = Box::new(AddElementCommand::new(doc, element));
            Ok(command)
        })?;
        self.observers.notify_observers(document_id, &message);
        Ok(saved)
    }

    pub fn remove_element(
        &self,
        document_id: &str,
        element_id: ElementId,
    ) -> WorkspaceResult<Document> {
        let saved = self.run_command(document_id, |doc| {
            let index = Self::locate(doc, element_id)?;
            let command: Box<dyn Command> = Box::new(RemoveElementCommand::new(doc, index));
            Ok(command)
        })?;
        self.observers
            .notify_observers(document_id, "Element deleted");
        Ok(saved)
    }

    /// Patch fields of an element, keeping its styles
    pub fn update_element(
        &self,
        document_id: &str,
        element_id: ElementId,
        fields: &Map<String, Value>,
    ) -> WorkspaceResult<Document> {
        let saved = self.run_command(document_id, |doc| {
            let index = Self::locate(doc, element_id)?;
            let current = &doc.elements()[index];
            let updated = ElementFactory::update(current, fields);
            let command: Box<dyn Command> =
                Box::new(ReplaceElementCommand::update(doc, index, updated));
            Ok(command)
        })?;
        self.observers
            .notify_observers(document_id, "Element updated");
        Ok(saved)
    }

    /// Decorate the element at `index` and persist the decorated form
    pub fn apply_styles(
        &self,
        document_id: &str,
        index: usize,
        styles: &[String],
    ) -> WorkspaceResult<Document> {
        let saved = self.run_command(document_id, |doc| {
            let current = doc.element(index).ok_or_else(|| {
                EditorError::from(DocumentError::IndexOutOfRange {
                    index,
                    len: doc.len(),
                })
            })?;
            let styled = apply_styles(current.clone(), styles);
            let command: Box<dyn Command> =
                Box::new(ReplaceElementCommand::style(doc, index, styled));
            Ok(command)
        })?;
        self.observers
            .notify_observers(document_id, &format!("Styles applied to element {}", index));
        Ok(saved)
    }

    pub fn structure(&self, document_id: &str) -> WorkspaceResult<Section> {
        let document = self.get_document(document_id)?;
        Ok(build_structure(&document))
    }

    // ---- history ---------------------------------------------------------

    pub fn undo(&self, document_id: &str) -> WorkspaceResult<HistoryStep> {
        self.step(document_id, Direction::Undo)
    }

    pub fn redo(&self, document_id: &str) -> WorkspaceResult<HistoryStep> {
        self.step(document_id, Direction::Redo)
    }

    pub fn clear_history(&self, document_id: &str) {
        self.history.clear(document_id);
    }

    // ---- versions --------------------------------------------------------

    pub fn create_version(&self, document_id: &str, label: &str) -> WorkspaceResult<VersionSummary> {
        let document = self.get_document(document_id)?;
        let memento = create_memento(&document, label);
        self.versions.save_memento(document_id, &memento)?;
        Ok(memento.summary())
    }

    /// Stored versions, newest first
    pub fn list_versions(&self, document_id: &str) -> Vec<VersionSummary> {
        self.versions.list_versions(document_id)
    }

    /// Overwrite the document with a stored version
    ///
    /// Undo history is kept; commands recorded before the restore still
    /// refer to element positions of the pre-restore content.
    pub fn restore_version(&self, document_id: &str, label: &str) -> WorkspaceResult<Document> {
        let gate = self.gate(document_id);
        let _guard = lock(&gate);

        let mut document = self.store.load(document_id)?;
        let memento = self
            .versions
            .get_memento(document_id, label)?
            .ok_or_else(|| WorkspaceError::VersionNotFound {
                document_id: document_id.to_string(),
                label: label.to_string(),
            })?;

        restore_from_memento(&mut document, &memento);
        let saved = self.store.save(&document)?;

        tracing::info!(document = document_id, label, "restored version");
        self.observers
            .notify_observers(document_id, &format!("Version {} restored", label));
        Ok(saved)
    }

    pub fn delete_version(&self, document_id: &str, label: &str) -> bool {
        self.versions.delete_memento(document_id, label)
    }

    // ---- collaboration ---------------------------------------------------

    pub fn add_collaborator(
        &self,
        document_id: &str,
        name: &str,
        email: &str,
    ) -> WorkspaceResult<Arc<Collaborator>> {
        self.get_document(document_id)?;

        let collaborator = Arc::new(Collaborator::new(new_id(), name, email, document_id));
        self.observers.attach(document_id, collaborator.clone());
        self.observers
            .notify_observers(document_id, &format!("{} joined the document", name));

        Ok(collaborator)
    }

    pub fn remove_collaborator(&self, document_id: &str, observer_id: &str) -> WorkspaceResult<()> {
        if self.observers.detach(document_id, observer_id) {
            tracing::info!(document = document_id, observer = observer_id, "removed collaborator");
            Ok(())
        } else {
            Err(WorkspaceError::CollaboratorNotFound {
                document_id: document_id.to_string(),
                observer_id: observer_id.to_string(),
            })
        }
    }

    pub fn list_collaborators(&self, document_id: &str) -> Vec<CollaboratorInfo> {
        self.observers
            .get_observers(document_id)
            .iter()
            .map(|observer| CollaboratorInfo {
                id: observer.observer_id().to_string(),
                name: observer.observer_name().to_string(),
            })
            .collect()
    }

    pub fn notify(&self, document_id: &str, message: &str) -> NotifyReport {
        self.observers.notify_observers(document_id, message)
    }

    // ---- export ----------------------------------------------------------

    pub fn export(&self, document_id: &str, format: &str) -> WorkspaceResult<ExportedDocument> {
        let document = self.get_document(document_id)?;
        let exported = self.exports.export(format, &document)?;

        tracing::info!(
            document = document_id,
            format = %exported.format_name,
            bytes = exported.bytes.len(),
            "exported document"
        );
        self.observers.notify_observers(
            document_id,
            &format!("Document exported to {}", format.trim().to_uppercase()),
        );
        Ok(exported)
    }

    pub fn available_formats(&self) -> Vec<FormatInfo> {
        self.exports.available_formats()
    }

    // ---- internals -------------------------------------------------------

    fn gate(&self, document_id: &str) -> Arc<Mutex<()>> {
        lock(&self.gates)
            .entry(document_id.to_string())
            .or_default()
            .clone()
    }

    fn locate(document: &Document, element_id: ElementId) -> WorkspaceResult<usize> {
        document
            .find_element(element_id)
            .map(|(index, _)| index)
            .ok_or_else(|| WorkspaceError::ElementNotFound {
                document_id: document.id.clone(),
                element_id: element_id.to_string(),
            })
    }

    fn run_command<F>(&self, document_id: &str, make: F) -> WorkspaceResult<Document>
    where
        F: FnOnce(&Document) -> WorkspaceResult<Box<dyn Command>>,
    {
        let gate = self.gate(document_id);
        let _guard = lock(&gate);

        let mut document = self.store.load(document_id)?;
        let command = make(&document)?;
        self.history.execute(&mut document, command)?;

        match self.store.save(&document) {
            Ok(saved) => Ok(saved),
            Err(e) => {
                self.history.discard_last(document_id);
                Err(e.into())
            }
        }
    }

    fn step(&self, document_id: &str, direction: Direction) -> WorkspaceResult<HistoryStep> {
        let gate = self.gate(document_id);
        let _guard = lock(&gate);

        let mut document = self.store.load(document_id)?;
        let applied = match direction {
            Direction::Undo => self.history.undo(&mut document)?,
            Direction::Redo => self.history.redo(&mut document)?,
        };
        if !applied {
            return Ok(HistoryStep { applied, document });
        }

        match self.store.save(&document) {
            Ok(saved) => Ok(HistoryStep {
                applied,
                document: saved,
            }),
            Err(e) => {
                // Move the command back to the stack it came from
                let rollback = match direction {
                    Direction::Undo => self.history.redo(&mut document),
                    Direction::Redo => self.history.undo(&mut document),
                };
                if let Err(rollback) = rollback {
                    tracing::warn!(document = document_id, error = %rollback, "history rollback failed");
                }
                Err(e.into())
            }
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceConfig::default())
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Undo,
    Redo,
}
