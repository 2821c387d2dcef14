//! # chat-core
//!
//! Domain layer containing the typing-presence and notification entities,
//! value objects, and the repository ports the service layer depends on.
//! This crate has zero dependencies on infrastructure (database, cache, web framework).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Channel, Message, Notification, NotificationKind, TypingRecord, User,
    ANONYMOUS_DISPLAY_NAME, DEFAULT_ACTIVE_WINDOW_MS, DEFAULT_RETENTION_WINDOW_MS,
    MAX_MESSAGE_LENGTH, UnknownNotificationKind,
};
pub use error::DomainError;
pub use traits::{
    ChannelMembership, ChannelRepository, MessageRepository, NotificationRepository, RepoResult,
    TypingRepository, UserRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
