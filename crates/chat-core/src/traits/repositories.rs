//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs; `chat-db` (PostgreSQL) and
//! `chat-cache` (Redis) provide the implementations.

use async_trait::async_trait;

use crate::entities::{Channel, Message, Notification, TypingRecord, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Typing Repository (Presence Store)
// ============================================================================

/// Storage for typing records, indexed by (channel, user), by
/// (channel, last_typed_at) and globally by last_typed_at.
///
/// Every mutation touches all indexes atomically.
#[async_trait]
pub trait TypingRepository: Send + Sync {
    /// Insert or replace the record for (channel_id, user_id)
    async fn upsert(&self, record: &TypingRecord) -> RepoResult<()>;

    /// Point lookup
    async fn find(&self, channel_id: Snowflake, user_id: Snowflake)
        -> RepoResult<Option<TypingRecord>>;

    /// Delete the record; returns whether one existed
    async fn remove(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Records in a channel with `last_typed_at >= since_ms`, oldest first.
    /// Must be served by the recency index, not a scan.
    async fn find_active(&self, channel_id: Snowflake, since_ms: i64)
        -> RepoResult<Vec<TypingRecord>>;

    /// Delete every record with `last_typed_at < cutoff_ms`; returns the count
    async fn remove_older_than(&self, cutoff_ms: i64) -> RepoResult<u64>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Indexed check for an unread notification for (recipient, channel)
    async fn has_unread(&self, recipient_id: Snowflake, channel_id: Snowflake)
        -> RepoResult<bool>;

    /// Insert unread notifications as one atomic unit.
    ///
    /// Rows whose (recipient, channel) already holds an unread notification
    /// are skipped. Returns the number of rows actually inserted.
    async fn insert_unread_batch(&self, notifications: &[Notification]) -> RepoResult<u64>;

    /// All unread notifications for a recipient
    async fn find_unread(&self, recipient_id: Snowflake) -> RepoResult<Vec<Notification>>;

    /// Unread notifications for a recipient in one channel
    async fn find_unread_in_channel(
        &self,
        recipient_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<Vec<Notification>>;

    /// Mark unread notifications for (recipient, channel) as read; returns the count
    async fn mark_channel_read(&self, recipient_id: Snowflake, channel_id: Snowflake)
        -> RepoResult<u64>;

    /// Mark every unread notification for a recipient as read; returns the count
    async fn mark_all_read(&self, recipient_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find channel by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>>;

    /// Check if a channel exists
    async fn exists(&self, id: Snowflake) -> RepoResult<bool>;

    /// Create a new channel
    async fn create(&self, channel: &Channel) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Create a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Find message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// Most recent `limit` messages in a channel, oldest first
    async fn find_by_channel(&self, channel_id: Snowflake, limit: i64)
        -> RepoResult<Vec<Message>>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find several users at once; missing ids are omitted
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Create a new user
    async fn create(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Channel Membership (external collaborator)
// ============================================================================

/// Resolves who should be notified about activity in a channel
#[async_trait]
pub trait ChannelMembership: Send + Sync {
    /// User ids of every member of the channel.
    ///
    /// Failure to resolve should be reported as
    /// [`DomainError::DependencyUnavailable`].
    async fn list_channel_members(&self, channel_id: Snowflake) -> RepoResult<Vec<Snowflake>>;
}
