//! Out-of-process notification handoff.
//!
//! The observer registry produces one [`NotificationEnvelope`] per successful
//! delivery and hands it to a [`NotificationTransport`]. Handoff is the only
//! guarantee; what the transport does with it is its own business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEnvelope {
    pub document_id: String,
    pub observer_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Notification channel closed")]
    Closed,
}

pub trait NotificationTransport: Send + Sync {
    fn send(&self, envelope: NotificationEnvelope) -> Result<(), TransportError>;
}

/// Transport backed by a tokio unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<NotificationEnvelope>,
}

impl ChannelTransport {
    pub fn new(tx: mpsc::UnboundedSender<NotificationEnvelope>) -> Self {
        Self { tx }
    }

    /// Create a transport together with the receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationEnvelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl NotificationTransport for ChannelTransport {
    fn send(&self, envelope: NotificationEnvelope) -> Result<(), TransportError> {
        self.tx.send(envelope).map_err(|_| TransportError::Closed)
    }
}
