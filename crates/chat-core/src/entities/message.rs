//! Message entity - represents a chat message

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Maximum message length in characters
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new Message
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        author_id: Snowflake,
        content: String,
    ) -> Self {
        Self {
            id,
            channel_id,
            author_id,
            content,
            created_at: Utc::now(),
        }
    }

    /// Check if message content is empty after trimming
    #[inline]
    pub fn is_blank(content: &str) -> bool {
        content.trim().is_empty()
    }

    /// Check if content exceeds [`MAX_MESSAGE_LENGTH`] characters
    #[inline]
    pub fn is_too_long(content: &str) -> bool {
        content.chars().count() > MAX_MESSAGE_LENGTH
    }
}
