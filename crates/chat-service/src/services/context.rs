//! Service context - dependency container for services
//!
//! Holds the repository ports, the id generator and the presence windows.

use std::sync::Arc;

use chat_cache::{RedisPool, RedisTypingRepository};
use chat_common::PresenceConfig;
use chat_core::traits::{
    ChannelMembership, ChannelRepository, MessageRepository, NotificationRepository,
    TypingRepository, UserRepository,
};
use chat_core::{Snowflake, SnowflakeGenerator};
use chat_db::{
    PgChannelMembership, PgChannelRepository, PgMessageRepository, PgNotificationRepository,
    PgPool, PgUserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Services only see the traits from `chat-core`; [`ServiceContext::from_pools`]
/// wires the PostgreSQL and Redis adapters, tests wire in-memory ones through
/// [`ServiceContextBuilder`].
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    channel_repo: Arc<dyn ChannelRepository>,
    message_repo: Arc<dyn MessageRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    typing_repo: Arc<dyn TypingRepository>,
    membership: Arc<dyn ChannelMembership>,

    snowflake_generator: Arc<SnowflakeGenerator>,
    presence: PresenceConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        channel_repo: Arc<dyn ChannelRepository>,
        message_repo: Arc<dyn MessageRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
        typing_repo: Arc<dyn TypingRepository>,
        membership: Arc<dyn ChannelMembership>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        presence: PresenceConfig,
    ) -> Self {
        Self {
            user_repo,
            channel_repo,
            message_repo,
            notification_repo,
            typing_repo,
            membership,
            snowflake_generator,
            presence,
        }
    }

    /// Production wiring: PostgreSQL for durable records, Redis for typing state
    pub fn from_pools(
        pool: PgPool,
        redis_pool: RedisPool,
        snowflake_generator: Arc<SnowflakeGenerator>,
        presence: PresenceConfig,
    ) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgChannelRepository::new(pool.clone())),
            Arc::new(PgMessageRepository::new(pool.clone())),
            Arc::new(PgNotificationRepository::new(pool.clone())),
            Arc::new(RedisTypingRepository::new(redis_pool)),
            Arc::new(PgChannelMembership::new(pool)),
            snowflake_generator,
            presence,
        )
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn channel_repo(&self) -> &dyn ChannelRepository {
        self.channel_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    pub fn typing_repo(&self) -> &dyn TypingRepository {
        self.typing_repo.as_ref()
    }

    /// Resolves the recipients of a channel's fan-out
    pub fn membership(&self) -> &dyn ChannelMembership {
        self.membership.as_ref()
    }

    // === Settings ===

    /// Active and retention windows for typing records
    pub fn presence_config(&self) -> &PresenceConfig {
        &self.presence
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("presence", &self.presence)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom adapters
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    channel_repo: Option<Arc<dyn ChannelRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    typing_repo: Option<Arc<dyn TypingRepository>>,
    membership: Option<Arc<dyn ChannelMembership>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    presence: Option<PresenceConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn channel_repo(mut self, repo: Arc<dyn ChannelRepository>) -> Self {
        self.channel_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn typing_repo(mut self, repo: Arc<dyn TypingRepository>) -> Self {
        self.typing_repo = Some(repo);
        self
    }

    pub fn membership(mut self, membership: Arc<dyn ChannelMembership>) -> Self {
        self.membership = Some(membership);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn presence(mut self, presence: PresenceConfig) -> Self {
        self.presence = Some(presence);
        self
    }

    /// Build the ServiceContext
    ///
    /// The generator defaults to worker 0 and the windows to
    /// [`PresenceConfig::default`].
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.user_repo.ok_or_else(|| ServiceError::internal("user_repo is required"))?,
            self.channel_repo.ok_or_else(|| ServiceError::internal("channel_repo is required"))?,
            self.message_repo.ok_or_else(|| ServiceError::internal("message_repo is required"))?,
            self.notification_repo
                .ok_or_else(|| ServiceError::internal("notification_repo is required"))?,
            self.typing_repo.ok_or_else(|| ServiceError::internal("typing_repo is required"))?,
            self.membership.ok_or_else(|| ServiceError::internal("membership is required"))?,
            self.snowflake_generator.unwrap_or_default(),
            self.presence.unwrap_or_default(),
        ))
    }
}
