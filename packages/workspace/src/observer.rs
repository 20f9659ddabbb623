//! # Observer Registry
//!
//! Collaborators attached per document, and change-notification fan-out.
//!
//! ## Semantics
//!
//! - Attaching the same observer twice is allowed; it is notified twice
//! - `detach` removes every attachment with the given observer id
//! - Notification snapshots the observer list, releases the registry lock,
//!   then tries each observer independently in attachment order
//! - A failing observer is logged and counted; later observers still run
//! - Each successful delivery is handed to the transport, if one is set,
//!   stamped with the same delivery time the observer recorded

use crate::transport::{NotificationEnvelope, NotificationTransport};
use chrono::{DateTime, Utc};
use folio_common::sync::{lock, read, write};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

#[derive(Debug, thiserror::Error)]
#[error("Observer {observer_id} rejected notification: {reason}")]
pub struct ObserverError {
    pub observer_id: String,
    pub reason: String,
}

/// A party notified of document changes
pub trait DocumentObserver: Send + Sync {
    fn observer_id(&self) -> &str;

    fn observer_name(&self) -> &str;

    /// Record a change notification for `document_id` delivered at `at`
    fn update(
        &self,
        document_id: &str,
        message: &str,
        at: DateTime<Utc>,
    ) -> Result<(), ObserverError>;
}

/// One entry in a collaborator's notification log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    pub delivered_at: DateTime<Utc>,
}

/// A user collaborating on one document
#[derive(Debug)]
pub struct Collaborator {
    id: String,
    name: String,
    email: String,
    document_id: String,
    notifications: Mutex<Vec<Notification>>,
}

impl Collaborator {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        document_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            document_id: document_id.into(),
            notifications: Mutex::new(Vec::new()),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Copy of the notification log, oldest first
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    pub fn notification_count(&self) -> usize {
        lock(&self.notifications).len()
    }
}

impl DocumentObserver for Collaborator {
    fn observer_id(&self) -> &str {
        &self.id
    }

    fn observer_name(&self) -> &str {
        &self.name
    }

    fn update(
        &self,
        document_id: &str,
        message: &str,
        delivered_at: DateTime<Utc>,
    ) -> Result<(), ObserverError> {
        let entry = Notification {
            message: format!(
                "Document {}: {} (notified at {})",
                document_id,
                message,
                delivered_at.to_rfc3339()
            ),
            delivered_at,
        };

        tracing::info!(
            collaborator = %self.name,
            notification = %entry.message,
            "collaborator received notification"
        );
        lock(&self.notifications).push(entry);
        Ok(())
    }
}

/// Outcome of a notification fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Observers attached to each document
#[derive(Default)]
pub struct ObserverRegistry {
    observers: RwLock<HashMap<String, Vec<Arc<dyn DocumentObserver>>>>,
    transport: Option<Arc<dyn NotificationTransport>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transport(transport: Arc<dyn NotificationTransport>) -> Self {
        Self {
            observers: RwLock::new(HashMap::new()),
            transport: Some(transport),
        }
    }

    pub fn attach(&self, document_id: &str, observer: Arc<dyn DocumentObserver>) {
        tracing::info!(
            document = document_id,
            observer = observer.observer_id(),
            "attached observer"
        );
        write(&self.observers)
            .entry(document_id.to_string())
            .or_default()
            .push(observer);
    }

    /// Remove every attachment of `observer_id`; `false` if none existed
    pub fn detach(&self, document_id: &str, observer_id: &str) -> bool {
        let mut observers = write(&self.observers);
        let Some(attached) = observers.get_mut(document_id) else {
            return false;
        };

        let before = attached.len();
        attached.retain(|o| o.observer_id() != observer_id);
        let removed = attached.len() != before;

        if attached.is_empty() {
            observers.remove(document_id);
        }
        removed
    }

    pub fn notify_observers(&self, document_id: &str, message: &str) -> NotifyReport {
        let snapshot = self.get_observers(document_id);
        let mut report = NotifyReport::default();

        for observer in snapshot {
            let delivered_at = Utc::now();
            match observer.update(document_id, message, delivered_at) {
                Ok(()) => {
                    report.delivered += 1;
                    self.hand_off(document_id, observer.observer_id(), message, delivered_at);
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        document = document_id,
                        observer = observer.observer_id(),
                        error = %e,
                        "notification delivery failed"
                    );
                }
            }
        }

        report
    }

    /// Attached observers in attachment order
    pub fn get_observers(&self, document_id: &str) -> Vec<Arc<dyn DocumentObserver>> {
        read(&self.observers)
            .get(document_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_observer_count(&self, document_id: &str) -> usize {
        read(&self.observers)
            .get(document_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Drop every observer of a document
    pub fn clear(&self, document_id: &str) {
        write(&self.observers).remove(document_id);
    }

    fn hand_off(
        &self,
        document_id: &str,
        observer_id: &str,
        message: &str,
        delivered_at: DateTime<Utc>,
    ) {
        let Some(transport) = &self.transport else {
            return;
        };

        let envelope = NotificationEnvelope {
            document_id: document_id.to_string(),
            observer_id: observer_id.to_string(),
            message: message.to_string(),
            timestamp: delivered_at,
        };
        if let Err(e) = transport.send(envelope) {
            tracing::warn!(
                document = document_id,
                observer = observer_id,
                error = %e,
                "notification transport handoff failed"
            );
        }
    }
}
