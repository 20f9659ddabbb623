//! # Folio Editor
//!
//! Core document model and editing engine for Folio.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ element / style: typed content + decorators │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: ordered elements + metadata       │
//! │  - builder / factory construction           │
//! │  - structure: derived Section/Leaf tree     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ commands + history: reversible edits        │
//! │ memento: labelled version snapshots         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Document is source of truth**: structure trees and renders are derived views
//! 2. **Decorators never mutate**: styling wraps, persisting it replaces the slot
//! 3. **History is per document**: stacks are keyed by document id and bounded
//! 4. **Snapshots are deep copies**: a memento never observes later edits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{AddElementCommand, CommandHistory, DocumentBuilder, Element};
//!
//! let mut doc = DocumentBuilder::new().title("Notes").author("Ada").build();
//! let history = CommandHistory::new();
//!
//! let cmd = AddElementCommand::new(&doc, Element::paragraph("Hello"));
//! history.execute(&mut doc, Box::new(cmd))?;
//! history.undo(&mut doc)?;
//! ```

mod builder;
mod commands;
mod document;
mod element;
mod errors;
mod factory;
mod memento;
mod structure;
mod style;
mod undo_stack;

pub use builder::DocumentBuilder;
pub use commands::{
    ensure_target, AddElementCommand, Command, CommandError, RemoveElementCommand,
    ReplaceElementCommand,
};
pub use document::{Document, DocumentError};
pub use element::{
    CodeBlock, Element, ElementType, Heading, Image, ListElement, Paragraph, Renderable, Table,
};
pub use errors::EditorError;
pub use factory::ElementFactory;
pub use memento::{
    create_memento, restore_from_memento, DocumentMemento, MementoCaretaker, MementoError,
    VersionSummary,
};
pub use structure::{
    build_structure, DocumentComponent, ElementLeaf, OutlineNode, Section, StructureError,
};
pub use style::{apply_styles, decorate, strip_styles, Style, Styled};
pub use undo_stack::{CommandHistory, DEFAULT_MAX_HISTORY};

// Re-export common types for convenience
pub use folio_common::{CoreError, ElementId};
