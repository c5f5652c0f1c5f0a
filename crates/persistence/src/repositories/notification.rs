//! Repository for the notification store, plus the database-backed
//! [`Notifier`] implementation.

use domain::services::notification::{NotificationKind, Notifier};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NotificationEntity;
use crate::metrics::QueryTimer;

/// Repository for notification inserts.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a notification row.
    pub async fn insert(
        &self,
        user_id: Uuid,
        kind: &str,
        title: &str,
        message: &str,
        metadata: Option<&Value>,
    ) -> Result<NotificationEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_notification");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (user_id, kind, title, message, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, kind, title, message, metadata, is_read, created_at
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(title)
        .bind(message)
        .bind(metadata)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

/// Database-backed notifier.
///
/// Inserts are best-effort: a failure is logged with the operation context
/// and never surfaced to the caller, so the primary action's outcome does not
/// depend on the notification store.
#[derive(Clone)]
pub struct PgNotifier {
    repo: NotificationRepository,
}

impl PgNotifier {
    /// Creates a notifier writing through the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: NotificationRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for PgNotifier {
    async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        message: &str,
        metadata: Option<Value>,
    ) {
        if let Err(err) = self
            .repo
            .insert(user_id, kind.as_str(), title, message, metadata.as_ref())
            .await
        {
            tracing::warn!(
                user_id = %user_id,
                kind = %kind,
                error = %err,
                "Failed to record notification"
            );
        }
    }
}
