//! # Folio Workspace
//!
//! Collaboration and persistence around the editor engine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Workspace                        │
//! │  ┌───────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐  │
//! │  │ Document  │ │ Command  │ │ Memento  │ │ Export │  │
//! │  │  Store    │ │ History  │ │Caretaker │ │Registry│  │
//! │  └───────────┘ └──────────┘ └──────────┘ └────────┘  │
//! │                ┌──────────────────┐                  │
//! │                │ ObserverRegistry │──► Transport     │
//! │                └──────────────────┘                  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Edits go through the command history and land in the store with a
//! version check; observers hear about them afterwards.

pub mod config;
pub mod draft;
pub mod error;
pub mod observer;
pub mod store;
pub mod transport;
pub mod workspace;

pub use config::WorkspaceConfig;
pub use draft::{DocumentDraft, ElementDraft};
pub use error::{WorkspaceError, WorkspaceResult};
pub use observer::{
    Collaborator, DocumentObserver, Notification, NotifyReport, ObserverError, ObserverRegistry,
};
pub use store::{DocumentStore, MemoryStore, StoreError};
pub use transport::{ChannelTransport, NotificationEnvelope, NotificationTransport, TransportError};
pub use workspace::{CollaboratorInfo, HistoryStep, Workspace};
