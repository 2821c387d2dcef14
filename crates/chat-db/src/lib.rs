//! # chat-db
//!
//! PostgreSQL (SQLx) implementations of the chat-core ports for users,
//! channels, messages, channel membership and notifications.
//!
//! ```rust,ignore
//! use chat_db::{create_pool, run_migrations, PgNotificationRepository, PoolSettings};
//!
//! let pool = create_pool(&PoolSettings::new(url)).await?;
//! run_migrations(&pool).await?;
//! let notifications = PgNotificationRepository::new(pool);
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{check_health, create_pool, run_migrations, PgPool, PoolSettings};
pub use repositories::{
    PgChannelMembership, PgChannelRepository, PgMessageRepository, PgNotificationRepository,
    PgUserRepository,
};
