//! Integration tests for the Redis typing store
//!
//! Require a running Redis:
//!
//! ```bash
//! export REDIS_URL="redis://127.0.0.1:6379"
//! cargo test -p chat-cache --test typing_store
//! ```

use std::sync::OnceLock;

use chat_cache::{RedisPool, RedisPoolConfig, RedisTypingRepository};
use chat_core::entities::TypingRecord;
use chat_core::traits::TypingRepository;
use chat_core::value_objects::{Snowflake, SnowflakeGenerator};

fn get_test_repo() -> Option<RedisTypingRepository> {
    let url = std::env::var("REDIS_URL").ok()?;
    let pool = RedisPool::new(RedisPoolConfig {
        url,
        max_connections: 4,
    })
    .ok()?;
    Some(RedisTypingRepository::new(pool))
}

fn test_snowflake() -> Snowflake {
    static GENERATOR: OnceLock<SnowflakeGenerator> = OnceLock::new();
    GENERATOR.get_or_init(|| SnowflakeGenerator::new(902)).generate()
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[tokio::test]
async fn test_upsert_refreshes_single_record() {
    let Some(repo) = get_test_repo() else {
        eprintln!("Skipping test: REDIS_URL not set");
        return;
    };

    let (channel, user) = (test_snowflake(), test_snowflake());
    let t1 = now_ms();

    repo.upsert(&TypingRecord::new(channel, user, "alice", t1)).await.unwrap();
    repo.upsert(&TypingRecord::new(channel, user, "alice b", t1 + 500)).await.unwrap();

    let record = repo.find(channel, user).await.unwrap().unwrap();
    assert_eq!(record.last_typed_at, t1 + 500);
    assert_eq!(record.display_name, "alice b");

    let active = repo.find_active(channel, t1 - 1).await.unwrap();
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let Some(repo) = get_test_repo() else {
        eprintln!("Skipping test: REDIS_URL not set");
        return;
    };

    let (channel, user) = (test_snowflake(), test_snowflake());
    repo.upsert(&TypingRecord::new(channel, user, "bob", now_ms())).await.unwrap();

    assert!(repo.remove(channel, user).await.unwrap());
    assert!(!repo.remove(channel, user).await.unwrap());
    assert!(repo.find(channel, user).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_active_respects_window_and_order() {
    let Some(repo) = get_test_repo() else {
        eprintln!("Skipping test: REDIS_URL not set");
        return;
    };

    let channel = test_snowflake();
    let (recent, older, stale) = (test_snowflake(), test_snowflake(), test_snowflake());
    let now = now_ms();

    repo.upsert(&TypingRecord::new(channel, recent, "recent", now - 1_000)).await.unwrap();
    repo.upsert(&TypingRecord::new(channel, older, "older", now - 5_000)).await.unwrap();
    repo.upsert(&TypingRecord::new(channel, stale, "stale", now - 15_000)).await.unwrap();

    let active = repo.find_active(channel, now - 10_000).await.unwrap();
    let names: Vec<_> = active.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(names, vec!["older", "recent"]);
}

#[tokio::test]
async fn test_sweep_removes_only_expired() {
    let Some(repo) = get_test_repo() else {
        eprintln!("Skipping test: REDIS_URL not set");
        return;
    };

    let channel = test_snowflake();
    let (fresh, expired) = (test_snowflake(), test_snowflake());
    let now = now_ms();
    let cutoff = now - 60_000;

    repo.upsert(&TypingRecord::new(channel, fresh, "fresh", cutoff)).await.unwrap();
    repo.upsert(&TypingRecord::new(channel, expired, "expired", cutoff - 1)).await.unwrap();

    let removed = repo.remove_older_than(cutoff).await.unwrap();
    assert!(removed >= 1);

    assert!(repo.find(channel, expired).await.unwrap().is_none());
    assert!(repo.find(channel, fresh).await.unwrap().is_some());

    // Nothing left to sweep for this channel
    repo.remove_older_than(cutoff).await.unwrap();
    assert!(repo.find(channel, fresh).await.unwrap().is_some());

    repo.remove(channel, fresh).await.unwrap();
}
