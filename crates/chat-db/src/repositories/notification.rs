//! PostgreSQL implementation of NotificationRepository
//!
//! Coalescing is enforced by the partial unique index
//! `uq_notifications_unread_per_channel (recipient_id, channel_id) WHERE NOT is_read`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use chat_core::entities::Notification;
use chat_core::traits::{NotificationRepository, RepoResult};
use chat_core::value_objects::Snowflake;

use crate::mappers::NotificationColumns;
use crate::models::NotificationModel;

use super::error::map_db_error;

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn into_entities(rows: Vec<NotificationModel>) -> RepoResult<Vec<Notification>> {
        rows.into_iter().map(Notification::try_from).collect()
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self))]
    async fn has_unread(&self, recipient_id: Snowflake, channel_id: Snowflake) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM notifications
                WHERE recipient_id = $1 AND channel_id = $2 AND NOT is_read
            )
            "#,
        )
        .bind(recipient_id.into_inner())
        .bind(channel_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self, notifications), fields(batch = notifications.len()))]
    async fn insert_unread_batch(&self, notifications: &[Notification]) -> RepoResult<u64> {
        let columns = NotificationColumns::new(notifications);
        if columns.is_empty() {
            return Ok(0);
        }

        // One statement: either every non-conflicting row lands or none do
        let result = sqlx::query(
            r#"
            INSERT INTO notifications
                (id, recipient_id, channel_id, message_id, author_id, is_read, kind, created_at)
            SELECT id, recipient_id, channel_id, message_id, author_id, FALSE, kind, created_at
            FROM UNNEST($1::BIGINT[], $2::BIGINT[], $3::BIGINT[], $4::BIGINT[], $5::BIGINT[],
                        $6::TEXT[], $7::TIMESTAMPTZ[])
                AS batch(id, recipient_id, channel_id, message_id, author_id, kind, created_at)
            ON CONFLICT (recipient_id, channel_id) WHERE NOT is_read DO NOTHING
            "#,
        )
        .bind(&columns.ids)
        .bind(&columns.recipient_ids)
        .bind(&columns.channel_ids)
        .bind(&columns.message_ids)
        .bind(&columns.author_ids)
        .bind(&columns.kinds)
        .bind(&columns.created_ats)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        debug!(
            requested = columns.len(),
            inserted = result.rows_affected(),
            "Inserted notification batch"
        );
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn find_unread(&self, recipient_id: Snowflake) -> RepoResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationModel>(
            r#"
            SELECT id, recipient_id, channel_id, message_id, author_id, is_read, kind, created_at
            FROM notifications
            WHERE recipient_id = $1 AND NOT is_read
            ORDER BY id
            "#,
        )
        .bind(recipient_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::into_entities(rows)
    }

    #[instrument(skip(self))]
    async fn find_unread_in_channel(
        &self,
        recipient_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationModel>(
            r#"
            SELECT id, recipient_id, channel_id, message_id, author_id, is_read, kind, created_at
            FROM notifications
            WHERE recipient_id = $1 AND channel_id = $2 AND NOT is_read
            ORDER BY id
            "#,
        )
        .bind(recipient_id.into_inner())
        .bind(channel_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Self::into_entities(rows)
    }

    #[instrument(skip(self))]
    async fn mark_channel_read(
        &self,
        recipient_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE recipient_id = $1 AND channel_id = $2 AND NOT is_read
            "#,
        )
        .bind(recipient_id.into_inner())
        .bind(channel_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn mark_all_read(&self, recipient_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE recipient_id = $1 AND NOT is_read
            "#,
        )
        .bind(recipient_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
