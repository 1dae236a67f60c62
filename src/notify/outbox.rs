//! Notification outbox persistence and the delivery worker.
//!
//! `enqueue` runs on any connection or transaction, so business writes and
//! their notification intents commit together. The worker polls Pending rows,
//! attempts delivery, and bounds retries; a row that keeps failing is marked
//! Failed and left for inspection. Delivery problems are logged and never
//! propagate beyond the worker.

use crate::entities::{
    Notification, notification,
    notification::{Channel, DeliveryStatus},
};
use crate::errors::Result;
use crate::notify::NotificationSender;
use sea_orm::{DatabaseConnection, QueryOrder, QuerySelect, Set, prelude::*};
use std::time::Duration;
use tracing::{debug, warn};

/// Rows fetched per worker pass.
const DRAIN_BATCH: u64 = 50;

/// Inserts a Pending outbox row.
///
/// Runs on any `ConnectionTrait`, so callers can enqueue inside their own
/// transaction and the intent commits with the business write.
pub async fn enqueue<C>(
    db: &C,
    channel: Channel,
    recipient: &str,
    body: &str,
) -> Result<notification::Model>
where
    C: ConnectionTrait,
{
    notification::ActiveModel {
        channel: Set(channel),
        recipient: Set(recipient.to_string()),
        body: Set(body.to_string()),
        status: Set(DeliveryStatus::Pending),
        attempts: Set(0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Lists Pending rows, oldest first.
pub async fn pending(db: &DatabaseConnection) -> Result<Vec<notification::Model>> {
    Notification::find()
        .filter(notification::Column::Status.eq(DeliveryStatus::Pending))
        .order_by_asc(notification::Column::Id)
        .limit(DRAIN_BATCH)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Attempts delivery of every Pending row once. Returns how many were sent.
///
/// A failed attempt bumps the attempt counter and records the error; once the
/// counter reaches `max_attempts` the row is marked Failed for good.
pub async fn drain_pending_once<S>(
    db: &DatabaseConnection,
    sender: &S,
    max_attempts: u32,
) -> Result<usize>
where
    S: NotificationSender,
{
    let rows = pending(db).await?;
    let mut delivered = 0;

    for row in rows {
        let outcome = sender.deliver(row.channel, &row.recipient, &row.body).await;
        let attempts = row.attempts + 1;
        let mut active: notification::ActiveModel = row.into();
        active.attempts = Set(attempts);

        match outcome {
            Ok(()) => {
                active.status = Set(DeliveryStatus::Sent);
                active.sent_at = Set(Some(chrono::Utc::now()));
                active.last_error = Set(None);
                delivered += 1;
            }
            Err(e) => {
                warn!(attempts, error = %e, "notification delivery failed");
                active.last_error = Set(Some(e.to_string()));
                if attempts >= i32::try_from(max_attempts).unwrap_or(i32::MAX) {
                    active.status = Set(DeliveryStatus::Failed);
                }
            }
        }

        active.update(db).await?;
    }

    Ok(delivered)
}

/// Runs the delivery worker until the process exits.
pub async fn run_outbox_worker<S>(
    db: DatabaseConnection,
    sender: S,
    poll_interval: Duration,
    max_attempts: u32,
) where
    S: NotificationSender,
{
    let mut ticker = tokio::time::interval(poll_interval);
    loop {
        ticker.tick().await;
        match drain_pending_once(&db, &sender, max_attempts).await {
            Ok(0) => {}
            Ok(count) => debug!(count, "delivered notifications"),
            Err(e) => warn!(error = %e, "outbox pass failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::*;
    use std::sync::Mutex;

    /// Records deliveries instead of dialing out.
    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(Channel, String, String)>>,
    }

    impl NotificationSender for RecordingSender {
        async fn deliver(&self, channel: Channel, recipient: &str, body: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((channel, recipient.to_string(), body.to_string()));
            Ok(())
        }
    }

    /// Fails every delivery.
    struct FailingSender;

    impl NotificationSender for FailingSender {
        async fn deliver(&self, _channel: Channel, _recipient: &str, _body: &str) -> Result<()> {
            Err(Error::Delivery {
                message: "provider unreachable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_enqueue_starts_pending() -> Result<()> {
        let db = setup_test_db().await?;

        let row = enqueue(&db, Channel::Whatsapp, "+919800000001", "hello").await?;
        assert_eq!(row.status, DeliveryStatus::Pending);
        assert_eq!(row.attempts, 0);
        assert!(row.sent_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_drain_marks_sent() -> Result<()> {
        let db = setup_test_db().await?;
        enqueue(&db, Channel::Whatsapp, "+919800000001", "first").await?;
        enqueue(&db, Channel::Push, "ExponentPushToken[abc]", "second").await?;

        let sender = RecordingSender::default();
        let delivered = drain_pending_once(&db, &sender, 3).await?;
        assert_eq!(delivered, 2);

        let recorded = sender.sent.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].1, "+919800000001");
        assert_eq!(recorded[1].0, Channel::Push);
        drop(recorded);

        assert!(pending(&db).await?.is_empty());
        let all = Notification::find().all(&db).await?;
        assert!(all.iter().all(|n| n.status == DeliveryStatus::Sent));
        assert!(all.iter().all(|n| n.sent_at.is_some()));

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_delivery_retries_until_bound() -> Result<()> {
        let db = setup_test_db().await?;
        enqueue(&db, Channel::Whatsapp, "+919800000001", "doomed").await?;

        // Two failing passes: still pending, attempts counted
        drain_pending_once(&db, &FailingSender, 3).await?;
        drain_pending_once(&db, &FailingSender, 3).await?;
        let row = Notification::find().one(&db).await?.unwrap();
        assert_eq!(row.status, DeliveryStatus::Pending);
        assert_eq!(row.attempts, 2);
        assert!(row.last_error.is_some());

        // Third pass exhausts the bound
        drain_pending_once(&db, &FailingSender, 3).await?;
        let row = Notification::find().one(&db).await?.unwrap();
        assert_eq!(row.status, DeliveryStatus::Failed);
        assert_eq!(row.attempts, 3);

        // Failed rows are no longer picked up
        let delivered = drain_pending_once(&db, &FailingSender, 3).await?;
        assert_eq!(delivered, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_recovery_after_transient_failure() -> Result<()> {
        let db = setup_test_db().await?;
        enqueue(&db, Channel::Whatsapp, "+919800000001", "eventually").await?;

        drain_pending_once(&db, &FailingSender, 3).await?;

        let sender = RecordingSender::default();
        let delivered = drain_pending_once(&db, &sender, 3).await?;
        assert_eq!(delivered, 1);

        let row = Notification::find().one(&db).await?.unwrap();
        assert_eq!(row.status, DeliveryStatus::Sent);
        assert_eq!(row.attempts, 2);
        assert!(row.last_error.is_none());

        Ok(())
    }
}
