//! PostgreSQL implementations of UserRepository and ChannelMembership

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use chat_core::entities::User;
use chat_core::traits::{ChannelMembership, RepoResult, UserRepository};
use chat_core::value_objects::Snowflake;

use crate::models::UserModel;

use super::error::{map_db_error, map_dependency_error};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT id, name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().copied().map(Snowflake::into_inner).collect();

        let results = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT id, name, created_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(&raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, user: &User) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.id.into_inner())
        .bind(user.name.as_deref())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

/// Channel membership backed by the users table
///
/// Channels have no explicit membership yet: every registered user is a
/// member of every channel.
#[derive(Clone)]
pub struct PgChannelMembership {
    pool: PgPool,
}

impl PgChannelMembership {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelMembership for PgChannelMembership {
    #[instrument(skip(self))]
    async fn list_channel_members(&self, channel_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_dependency_error)?;

        debug!(members = ids.len(), "Resolved channel members");
        Ok(ids.into_iter().map(Snowflake::new).collect())
    }
}
