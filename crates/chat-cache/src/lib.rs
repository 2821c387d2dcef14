//! # chat-cache
//!
//! Redis layer for ephemeral state: the typing presence store.
//!
//! ```ignore
//! use chat_cache::{RedisPool, RedisPoolConfig, RedisTypingRepository};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let typing = RedisTypingRepository::new(pool);
//! typing.upsert(&TypingRecord::new(channel_id, user_id, "alice", now_ms)).await?;
//! ```

pub mod pool;
pub mod presence;

pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use presence::RedisTypingRepository;
