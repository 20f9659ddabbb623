//! # Undo/Redo History
//!
//! Per-document command history.
//!
//! ## Design
//!
//! - Each document id owns an undo stack and a redo stack
//! - Executing a command pushes it onto the undo stack and clears redo
//! - The redo entries (and any undo entry evicted by the push) are held back
//!   until the next undo or redo, so `discard_last` can put them back
//! - Undo pops the newest command, reverses it and moves it to redo
//! - Redo re-executes it and moves it back
//! - Both stacks are bounded; the oldest entries are evicted first
//!
//! Stack entries are popped while holding the document's stack lock, and the
//! side effect runs after the lock is released. Distinct documents never
//! contend on the same stack lock.
//!
//! ## Example
//!
//! ```rust,ignore
//! let history = CommandHistory::new();
//! let mut doc = Document::new("Notes", "Ada");
//!
//! let cmd = AddElementCommand::new(&doc, Element::paragraph("Hello"));
//! history.execute(&mut doc, Box::new(cmd))?;
//!
//! history.undo(&mut doc)?;
//! history.redo(&mut doc)?;
//! ```

use crate::commands::{ensure_target, Command, CommandError};
use crate::document::Document;
use folio_common::sync::{lock, read, write};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

/// Default bound on each per-document stack
pub const DEFAULT_MAX_HISTORY: usize = 50;

type Stack = VecDeque<Box<dyn Command>>;

#[derive(Default)]
struct DocumentHistory {
    /// Executed commands (most recent last)
    undo: Mutex<Stack>,

    /// Undone commands (most recent last)
    redo: Mutex<Stack>,

    /// What the newest execute pushed out of the stacks
    displaced: Mutex<Option<Displaced>>,
}

struct Displaced {
    redo: Stack,
    /// Oldest undo entries evicted by the bound (oldest first)
    evicted: Vec<Box<dyn Command>>,
}

/// Undo/redo stacks for every document
pub struct CommandHistory {
    documents: RwLock<HashMap<String, Arc<DocumentHistory>>>,

    /// Maximum entries per stack (0 = unlimited)
    max_depth: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_HISTORY)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Run a command against `document` and record it for undo
    pub fn execute(
        &self,
        document: &mut Document,
        mut command: Box<dyn Command>,
    ) -> Result<(), CommandError> {
        ensure_target(command.as_ref(), document)?;
        command.execute(document)?;

        tracing::debug!(
            document = %document.id,
            command = command.description(),
            "executed command"
        );

        let history = self.history_for(&document.id);
        let evicted = self.push_bounded(&history.undo, command);
        let redo = std::mem::take(&mut *lock(&history.redo));
        *lock(&history.displaced) = Some(Displaced { redo, evicted });

        Ok(())
    }

    /// Undo the most recent command; `Ok(false)` when there is nothing to undo
    pub fn undo(&self, document: &mut Document) -> Result<bool, CommandError> {
        let Some(history) = self.existing(&document.id) else {
            return Ok(false);
        };

        let popped = lock(&history.undo).pop_back();
        let Some(mut command) = popped else {
            return Ok(false);
        };

        let outcome = ensure_target(command.as_ref(), document)
            .and_then(|_| command.undo(document));

        match outcome {
            Ok(()) => {
                tracing::debug!(
                    document = %document.id,
                    command = command.description(),
                    "undid command"
                );
                lock(&history.displaced).take();
                self.push_bounded(&history.redo, command);
                Ok(true)
            }
            Err(e) => {
                lock(&history.undo).push_back(command);
                Err(e)
            }
        }
    }

    /// Re-execute the most recently undone command
    pub fn redo(&self, document: &mut Document) -> Result<bool, CommandError> {
        let Some(history) = self.existing(&document.id) else {
            return Ok(false);
        };

        let popped = lock(&history.redo).pop_back();
        let Some(mut command) = popped else {
            return Ok(false);
        };

        let outcome = ensure_target(command.as_ref(), document)
            .and_then(|_| command.execute(document));

        match outcome {
            Ok(()) => {
                tracing::debug!(
                    document = %document.id,
                    command = command.description(),
                    "redid command"
                );
                lock(&history.displaced).take();
                self.push_bounded(&history.undo, command);
                Ok(true)
            }
            Err(e) => {
                lock(&history.redo).push_back(command);
                Err(e)
            }
        }
    }

    /// Drop the newest undo entry without running it
    ///
    /// For callers whose edit was executed but could not be persisted. When
    /// called right after `execute`, the redo stack and any undo entry the
    /// push evicted are restored, leaving the stacks as they were before.
    pub fn discard_last(&self, document_id: &str) -> bool {
        let Some(history) = self.existing(document_id) else {
            return false;
        };
        let displaced = lock(&history.displaced).take();

        let mut undo = lock(&history.undo);
        if undo.pop_back().is_none() {
            return false;
        }

        if let Some(displaced) = displaced {
            for command in displaced.evicted.into_iter().rev() {
                undo.push_front(command);
            }
            drop(undo);
            *lock(&history.redo) = displaced.redo;
        }
        true
    }

    /// Drop all history for a document
    pub fn clear(&self, document_id: &str) {
        write(&self.documents).remove(document_id);
    }

    pub fn can_undo(&self, document_id: &str) -> bool {
        self.undo_depth(document_id) > 0
    }

    pub fn can_redo(&self, document_id: &str) -> bool {
        self.redo_depth(document_id) > 0
    }

    pub fn undo_depth(&self, document_id: &str) -> usize {
        self.existing(document_id)
            .map(|h| lock(&h.undo).len())
            .unwrap_or(0)
    }

    pub fn redo_depth(&self, document_id: &str) -> usize {
        self.existing(document_id)
            .map(|h| lock(&h.redo).len())
            .unwrap_or(0)
    }

    /// Description of the command `undo` would reverse
    pub fn undo_description(&self, document_id: &str) -> Option<String> {
        let history = self.existing(document_id)?;
        let undo = lock(&history.undo);
        undo.back().map(|cmd| cmd.description().to_string())
    }

    /// Description of the command `redo` would re-execute
    pub fn redo_description(&self, document_id: &str) -> Option<String> {
        let history = self.existing(document_id)?;
        let redo = lock(&history.redo);
        redo.back().map(|cmd| cmd.description().to_string())
    }

    fn existing(&self, document_id: &str) -> Option<Arc<DocumentHistory>> {
        read(&self.documents).get(document_id).cloned()
    }

    fn history_for(&self, document_id: &str) -> Arc<DocumentHistory> {
        if let Some(history) = self.existing(document_id) {
            return history;
        }
        write(&self.documents)
            .entry(document_id.to_string())
            .or_default()
            .clone()
    }

    /// Push onto `stack`, returning the entries the bound evicted
    fn push_bounded(
        &self,
        stack: &Mutex<Stack>,
        command: Box<dyn Command>,
    ) -> Vec<Box<dyn Command>> {
        let mut stack = lock(stack);
        stack.push_back(command);

        let mut evicted = Vec::new();
        if self.max_depth > 0 {
            while stack.len() > self.max_depth {
                evicted.extend(stack.pop_front());
            }
        }
        evicted
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{AddElementCommand, RemoveElementCommand};
    use crate::document::DocumentError;
    use crate::element::{Element, Renderable};

    fn add(history: &CommandHistory, doc: &mut Document, content: &str) {
        let cmd = AddElementCommand::new(doc, Element::paragraph(content));
        history.execute(doc, Box::new(cmd)).unwrap();
    }

    fn contents(doc: &Document) -> Vec<String> {
        doc.elements().iter().map(|e| e.content()).collect()
    }

    #[test]
    fn test_history_creation() {
        let history = CommandHistory::new();
        assert_eq!(history.max_depth(), DEFAULT_MAX_HISTORY);
        assert_eq!(history.undo_depth("missing"), 0);
        assert!(!history.can_undo("missing"));
        assert!(!history.can_redo("missing"));
    }

    #[test]
    fn test_execute_undo_redo() {
        let history = CommandHistory::new();
        let mut doc = Document::new("Notes", "Ada");

        add(&history, &mut doc, "Hello");
        assert_eq!(history.undo_depth(&doc.id), 1);
        assert_eq!(
            history.undo_description(&doc.id).as_deref(),
            Some("Add paragraph element")
        );

        assert!(history.undo(&mut doc).unwrap());
        assert!(doc.is_empty());
        assert_eq!(history.redo_depth(&doc.id), 1);

        assert!(history.redo(&mut doc).unwrap());
        assert_eq!(contents(&doc), vec!["Hello"]);
        assert_eq!(history.undo_depth(&doc.id), 1);
        assert_eq!(history.redo_depth(&doc.id), 0);
    }

    #[test]
    fn test_empty_stacks_return_false() {
        let history = CommandHistory::new();
        let mut doc = Document::new("Notes", "Ada");
        assert!(!history.undo(&mut doc).unwrap());
        assert!(!history.redo(&mut doc).unwrap());

        add(&history, &mut doc, "a");
        assert!(!history.redo(&mut doc).unwrap());
    }

    #[test]
    fn test_new_command_clears_redo() {
        let history = CommandHistory::new();
        let mut doc = Document::new("Notes", "Ada");

        add(&history, &mut doc, "a");
        history.undo(&mut doc).unwrap();
        assert_eq!(history.redo_depth(&doc.id), 1);

        add(&history, &mut doc, "b");
        assert_eq!(history.redo_depth(&doc.id), 0);
        assert!(!history.redo(&mut doc).unwrap());
    }

    #[test]
    fn test_max_depth_enforced() {
        let history = CommandHistory::with_max_depth(2);
        let mut doc = Document::new("Notes", "Ada");

        for i in 0..3 {
            add(&history, &mut doc, &format!("Text {}", i));
        }

        assert_eq!(history.undo_depth(&doc.id), 2);
        assert!(history.undo(&mut doc).unwrap());
        assert!(history.undo(&mut doc).unwrap());
        assert!(!history.undo(&mut doc).unwrap());
        assert_eq!(contents(&doc), vec!["Text 0"]);
    }

    #[test]
    fn test_failed_execute_records_nothing() {
        let history = CommandHistory::new();
        let mut doc = Document::new("Notes", "Ada");

        let cmd = RemoveElementCommand::new(&doc, 0);
        let err = history.execute(&mut doc, Box::new(cmd)).unwrap_err();
        assert_eq!(
            err,
            CommandError::Document(DocumentError::IndexOutOfRange { index: 0, len: 0 })
        );
        assert_eq!(history.undo_depth(&doc.id), 0);
    }

    #[test]
    fn test_failed_redo_puts_command_back() {
        let history = CommandHistory::new();
        let mut doc = Document::new("Notes", "Ada");
        add(&history, &mut doc, "a");
        add(&history, &mut doc, "b");

        let remove = RemoveElementCommand::new(&doc, 1);
        history.execute(&mut doc, Box::new(remove)).unwrap();
        history.undo(&mut doc).unwrap();

        // Shrink the document behind the history's back so redo cannot apply
        doc.set_elements(Vec::new());

        assert!(history.redo(&mut doc).is_err());
        assert_eq!(history.redo_depth(&doc.id), 1);
        assert_eq!(
            history.redo_description(&doc.id).as_deref(),
            Some("Remove element at index 1")
        );
    }

    #[test]
    fn test_mismatched_document_is_rejected() {
        let history = CommandHistory::new();
        let doc = Document::new("Notes", "Ada");
        let mut other = Document::new("Other", "Bob");

        let cmd = AddElementCommand::new(&doc, Element::paragraph("x"));
        let err = history.execute(&mut other, Box::new(cmd)).unwrap_err();
        assert!(matches!(err, CommandError::DocumentMismatch { .. }));
        assert!(other.is_empty());
    }

    #[test]
    fn test_discard_last_leaves_document_alone() {
        let history = CommandHistory::new();
        let mut doc = Document::new("Notes", "Ada");
        add(&history, &mut doc, "a");

        assert!(history.discard_last(&doc.id));
        assert_eq!(history.undo_depth(&doc.id), 0);
        assert_eq!(contents(&doc), vec!["a"]);
        assert!(!history.discard_last(&doc.id));
    }

    #[test]
    fn test_discard_after_execute_restores_redo() {
        let history = CommandHistory::new();
        let mut doc = Document::new("Notes", "Ada");
        add(&history, &mut doc, "a");
        history.undo(&mut doc).unwrap();

        add(&history, &mut doc, "b");
        assert_eq!(history.redo_depth(&doc.id), 0);

        // The edit never reached storage; the caller reloads the old state
        assert!(history.discard_last(&doc.id));
        doc.set_elements(Vec::new());
        assert_eq!(history.undo_depth(&doc.id), 0);
        assert_eq!(history.redo_depth(&doc.id), 1);

        assert!(history.redo(&mut doc).unwrap());
        assert_eq!(contents(&doc), vec!["a"]);
    }

    #[test]
    fn test_discard_after_execute_restores_evicted_undo() {
        let history = CommandHistory::with_max_depth(1);
        let mut doc = Document::new("Notes", "Ada");
        add(&history, &mut doc, "a");
        add(&history, &mut doc, "b");
        assert_eq!(history.undo_depth(&doc.id), 1);

        assert!(history.discard_last(&doc.id));
        doc.set_elements(vec![Element::paragraph("a")]);
        assert_eq!(history.undo_depth(&doc.id), 1);

        assert!(history.undo(&mut doc).unwrap());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_discard_after_undo_keeps_redo() {
        let history = CommandHistory::new();
        let mut doc = Document::new("Notes", "Ada");
        add(&history, &mut doc, "a");
        add(&history, &mut doc, "b");
        history.undo(&mut doc).unwrap();

        assert!(history.discard_last(&doc.id));
        assert_eq!(history.undo_depth(&doc.id), 0);
        assert_eq!(history.redo_depth(&doc.id), 1);
    }

    #[test]
    fn test_clear_drops_both_stacks() {
        let history = CommandHistory::new();
        let mut doc = Document::new("Notes", "Ada");
        add(&history, &mut doc, "a");
        add(&history, &mut doc, "b");
        history.undo(&mut doc).unwrap();

        history.clear(&doc.id);
        assert_eq!(history.undo_depth(&doc.id), 0);
        assert_eq!(history.redo_depth(&doc.id), 0);
    }
}
