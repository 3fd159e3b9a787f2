//! Notification queue adapters.
//!
//! The domain only produces events; rendering and delivery belong to the
//! worker process consuming the Apalis queue. When no queue storage is
//! configured the logging adapter keeps the application runnable and makes
//! the discarded events visible.

use async_trait::async_trait;
use tokio::sync::Mutex;

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;

use crate::domain::notification::Notification;
use crate::domain::ports::{NotificationQueue, NotificationQueueError};

/// Namespace the delivery worker polls for notification jobs.
pub const NOTIFICATION_NAMESPACE: &str = "storefront::notifications";

/// Producer side of the PostgreSQL-backed Apalis queue.
pub struct ApalisNotificationQueue {
    storage: Mutex<PostgresStorage<Notification>>,
}

impl ApalisNotificationQueue {
    /// Prepare the Apalis schema on the given pool and build the producer.
    pub async fn setup(pool: sqlx::PgPool) -> Result<Self, NotificationQueueError> {
        PostgresStorage::setup(&pool)
            .await
            .map_err(|err| NotificationQueueError::unavailable(err.to_string()))?;
        let config = apalis_sql::Config::new(NOTIFICATION_NAMESPACE);
        Ok(Self {
            storage: Mutex::new(PostgresStorage::new_with_config(pool, config)),
        })
    }
}

#[async_trait]
impl NotificationQueue for ApalisNotificationQueue {
    async fn enqueue(&self, event: Notification) -> Result<(), NotificationQueueError> {
        let kind = event.kind();
        let mut storage = self.storage.lock().await;
        storage
            .push(event)
            .await
            .map_err(|err| NotificationQueueError::rejected(err.to_string()))?;
        tracing::debug!(kind, "notification enqueued");
        Ok(())
    }
}

/// Fallback adapter used when no queue storage is configured.
///
/// Events are acknowledged and dropped; the warning keeps the gap visible
/// in logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotificationQueue;

impl LoggingNotificationQueue {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationQueue for LoggingNotificationQueue {
    async fn enqueue(&self, event: Notification) -> Result<(), NotificationQueueError> {
        tracing::warn!(
            kind = event.kind(),
            recipient = event.recipient(),
            "notification discarded: no queue storage configured"
        );
        Ok(())
    }
}
