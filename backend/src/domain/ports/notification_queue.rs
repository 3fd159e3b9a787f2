//! Port describing the enqueue side of email notification dispatch.
//!
//! Rendering and delivery happen in an external worker; the domain only
//! hands events over.

use async_trait::async_trait;

use crate::domain::notification::Notification;

/// Errors surfaced by queue adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationQueueError {
    /// Queue storage could not be reached.
    #[error("notification queue is unavailable: {message}")]
    Unavailable { message: String },
    /// The job was refused by the queue.
    #[error("notification was rejected by the queue: {message}")]
    Rejected { message: String },
}

impl NotificationQueueError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Enqueue an event for out-of-process delivery.
    async fn enqueue(&self, event: Notification) -> Result<(), NotificationQueueError>;
}

/// Fixture queue that accepts and discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationQueue;

#[async_trait]
impl NotificationQueue for FixtureNotificationQueue {
    async fn enqueue(&self, _event: Notification) -> Result<(), NotificationQueueError> {
        Ok(())
    }
}
