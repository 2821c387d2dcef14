//! Typing records in Redis.
//!
//! Layout, one logical record per (channel, user):
//!
//! | Key | Type | Content | Serves |
//! |-----|------|---------|--------|
//! | `typing:{channel}` | ZSET | member user id, score `last_typed_at` | recency range reads |
//! | `typing_names:{channel}` | HASH | user id → display name | point lookups |
//! | `typing:all` | ZSET | member `{channel}:{user}`, score `last_typed_at` | global sweep |
//!
//! Writes go through `MULTI/EXEC` and the sweep is a Lua script, so the
//! three structures never disagree about a record.

use async_trait::async_trait;
use redis::Script;
use tracing::{debug, instrument, warn};

use chat_core::entities::TypingRecord;
use chat_core::traits::{RepoResult, TypingRepository};
use chat_core::value_objects::Snowflake;

use crate::pool::{RedisPool, RedisPoolError};

const CHANNEL_INDEX_PREFIX: &str = "typing:";
const NAMES_PREFIX: &str = "typing_names:";
const GLOBAL_INDEX_KEY: &str = "typing:all";

/// Removes every record older than the cutoff from all three structures.
///
/// KEYS[1] = global index, ARGV[1] = cutoff (exclusive),
/// ARGV[2] = channel index prefix, ARGV[3] = names prefix
const SWEEP_SCRIPT: &str = r"
local stale = redis.call('ZRANGEBYSCORE', KEYS[1], '-inf', '(' .. ARGV[1])
for _, member in ipairs(stale) do
    local sep = string.find(member, ':', 1, true)
    if sep then
        local channel = string.sub(member, 1, sep - 1)
        local user = string.sub(member, sep + 1)
        redis.call('ZREM', ARGV[2] .. channel, user)
        redis.call('HDEL', ARGV[3] .. channel, user)
    end
end
if #stale > 0 then
    redis.call('ZREMRANGEBYSCORE', KEYS[1], '-inf', '(' .. ARGV[1])
end
return #stale
";

/// Redis-backed presence store
#[derive(Clone)]
pub struct RedisTypingRepository {
    pool: RedisPool,
    sweep: Script,
}

impl RedisTypingRepository {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            sweep: Script::new(SWEEP_SCRIPT),
        }
    }

    fn channel_key(channel_id: Snowflake) -> String {
        format!("{CHANNEL_INDEX_PREFIX}{channel_id}")
    }

    fn names_key(channel_id: Snowflake) -> String {
        format!("{NAMES_PREFIX}{channel_id}")
    }

    fn global_member(channel_id: Snowflake, user_id: Snowflake) -> String {
        format!("{channel_id}:{user_id}")
    }
}

/// Scores are stored as doubles; millisecond timestamps fit exactly
fn score_to_millis(score: f64) -> i64 {
    score.round() as i64
}

#[async_trait]
impl TypingRepository for RedisTypingRepository {
    #[instrument(skip(self, record), fields(channel_id = %record.channel_id, user_id = %record.user_id))]
    async fn upsert(&self, record: &TypingRecord) -> RepoResult<()> {
        let mut conn = self.pool.get().await?;
        let user = record.user_id.to_string();

        let _: () = redis::pipe()
            .atomic()
            .zadd(Self::channel_key(record.channel_id), &user, record.last_typed_at)
            .ignore()
            .hset(Self::names_key(record.channel_id), &user, &record.display_name)
            .ignore()
            .zadd(
                GLOBAL_INDEX_KEY,
                Self::global_member(record.channel_id, record.user_id),
                record.last_typed_at,
            )
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        debug!(last_typed_at = record.last_typed_at, "Upserted typing record");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<TypingRecord>> {
        let mut conn = self.pool.get().await?;
        let user = user_id.to_string();

        let (score, name): (Option<f64>, Option<String>) = redis::pipe()
            .atomic()
            .zscore(Self::channel_key(channel_id), &user)
            .hget(Self::names_key(channel_id), &user)
            .query_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        Ok(match (score, name) {
            (Some(score), Some(name)) => Some(TypingRecord::new(
                channel_id,
                user_id,
                name,
                score_to_millis(score),
            )),
            _ => None,
        })
    }

    #[instrument(skip(self))]
    async fn remove(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let mut conn = self.pool.get().await?;
        let user = user_id.to_string();

        let (removed, _, _): (i64, i64, i64) = redis::pipe()
            .atomic()
            .zrem(Self::channel_key(channel_id), &user)
            .hdel(Self::names_key(channel_id), &user)
            .zrem(GLOBAL_INDEX_KEY, Self::global_member(channel_id, user_id))
            .query_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        debug!(removed = removed > 0, "Removed typing record");
        Ok(removed > 0)
    }

    #[instrument(skip(self))]
    async fn find_active(
        &self,
        channel_id: Snowflake,
        since_ms: i64,
    ) -> RepoResult<Vec<TypingRecord>> {
        let mut conn = self.pool.get().await?;

        // ZRANGEBYSCORE returns ascending score order
        let members: Vec<(String, f64)> = redis::cmd("ZRANGEBYSCORE")
            .arg(Self::channel_key(channel_id))
            .arg(since_ms)
            .arg("+inf")
            .arg("WITHSCORES")
            .query_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        if members.is_empty() {
            return Ok(Vec::new());
        }

        let users: Vec<&str> = members.iter().map(|(user, _)| user.as_str()).collect();
        let names: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(Self::names_key(channel_id))
            .arg(&users)
            .query_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        let mut records = Vec::with_capacity(members.len());
        for ((user, score), name) in members.into_iter().zip(names) {
            // Name gone between the two reads: the record was deleted
            let Some(name) = name else { continue };
            match Snowflake::parse(&user) {
                Ok(user_id) => records.push(TypingRecord::new(
                    channel_id,
                    user_id,
                    name,
                    score_to_millis(score),
                )),
                Err(_) => warn!(member = %user, "Skipping malformed typing member"),
            }
        }

        Ok(records)
    }

    #[instrument(skip(self))]
    async fn remove_older_than(&self, cutoff_ms: i64) -> RepoResult<u64> {
        let mut conn = self.pool.get().await?;

        let removed: i64 = self
            .sweep
            .key(GLOBAL_INDEX_KEY)
            .arg(cutoff_ms)
            .arg(CHANNEL_INDEX_PREFIX)
            .arg(NAMES_PREFIX)
            .invoke_async(&mut conn)
            .await
            .map_err(RedisPoolError::from)?;

        Ok(u64::try_from(removed).unwrap_or(0))
    }
}
