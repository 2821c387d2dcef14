//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::Message;
use chat_core::traits::{MessageRepository, RepoResult};
use chat_core::value_objects::Snowflake;

use crate::models::MessageModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, channel_id, author_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.channel_id.into_inner())
        .bind(message.author_id.into_inner())
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, channel_id, author_id, content, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_by_channel(&self, channel_id: Snowflake, limit: i64) -> RepoResult<Vec<Message>> {
        let limit = limit.clamp(1, 100);

        // Newest page first, then flipped so callers get chronological order
        let mut results = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, channel_id, author_id, content, created_at
            FROM messages
            WHERE channel_id = $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(channel_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.reverse();
        Ok(results.into_iter().map(Message::from).collect())
    }
}
